use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPassword {
    pub email: String,
}

impl ForgotPassword {
    /// The part after the last `@`, safe to log.
    pub fn domain(&self) -> &str {
        self.email
            .rsplit_once('@')
            .map_or("", |(_, domain)| domain)
    }
}
