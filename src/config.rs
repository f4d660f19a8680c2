use std::net::IpAddr;
use std::time::Duration;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub rate_limit: u32,
    pub rate_limit_window: Duration,
    pub form_state_ttl: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("TOOLSUBMIT_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid TOOLSUBMIT_HOST: {e}"))?;

        let port: u16 = env_or("TOOLSUBMIT_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid TOOLSUBMIT_PORT: {e}"))?;

        // Screenshots alone may be 5MB; leave room for the other parts.
        let max_body_size: usize = env_or("TOOLSUBMIT_MAX_BODY_SIZE", "8388608")
            .parse()
            .map_err(|e| format!("Invalid TOOLSUBMIT_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = env_or("TOOLSUBMIT_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid TOOLSUBMIT_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rate_limit: u32 = env_or("TOOLSUBMIT_RATE_LIMIT", "10")
            .parse()
            .map_err(|e| format!("Invalid TOOLSUBMIT_RATE_LIMIT: {e}"))?;

        let rate_limit_window: u64 = env_or("TOOLSUBMIT_RATE_LIMIT_WINDOW_SECS", "60")
            .parse()
            .map_err(|e| format!("Invalid TOOLSUBMIT_RATE_LIMIT_WINDOW_SECS: {e}"))?;

        let form_state_ttl: u64 = env_or("TOOLSUBMIT_FORM_STATE_TTL_SECS", "900")
            .parse()
            .map_err(|e| format!("Invalid TOOLSUBMIT_FORM_STATE_TTL_SECS: {e}"))?;

        let log_level = env_or("TOOLSUBMIT_LOG_LEVEL", "info");

        Ok(Config {
            host,
            port,
            max_body_size,
            trusted_proxies,
            rate_limit,
            rate_limit_window: Duration::from_secs(rate_limit_window),
            form_state_ttl: Duration::from_secs(form_state_ttl),
            log_level,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            max_body_size: 8 * 1024 * 1024,
            trusted_proxies: Vec::new(),
            rate_limit: 10,
            rate_limit_window: Duration::from_secs(60),
            form_state_ttl: Duration::from_secs(900),
            log_level: "info".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
