pub mod auth;
pub mod tools;

use std::net::{IpAddr, SocketAddr};

use axum::body::Bytes;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;

use crate::error::AppError;
use crate::form_state::FormKind;
use crate::state::SharedState;
use crate::submission::{metadata, parser};
use crate::validation::RawValue;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Tool submissions
        .route("/api/v1/tools", post(tools::submit))
        .route("/api/v1/tools/form", get(tools::form_state))
        // Auth
        .route("/api/v1/auth/forgot-password", post(auth::forgot_password))
        .route(
            "/api/v1/auth/forgot-password/form",
            get(auth::forgot_password_form),
        )
}

fn client_ip(state: &SharedState, headers: &HeaderMap, addr: SocketAddr) -> IpAddr {
    metadata::client_ip(headers, Some(addr.ip()), &state.config.trusted_proxies)
}

/// Rate-limit, then parse the body into raw form input.
async fn intake(
    state: &SharedState,
    form: FormKind,
    ip: IpAddr,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<RawValue, AppError> {
    if let Err(retry_after) = state.submission_limiter.check(form, ip) {
        tracing::warn!("Rate limited {form} submission from {ip}");
        return Err(AppError::RateLimited(format!(
            "Too many submissions. Retry after {retry_after}s"
        )));
    }

    tracing::debug!(
        "Received {form} submission from {ip} ({})",
        metadata::user_agent(headers)
    );

    parser::parse_request(headers, body)
        .await
        .map_err(AppError::BadRequest)
}
