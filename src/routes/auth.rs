use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use crate::error::AppError;
use crate::form_state::{FormKind, FormSession, FormState};
use crate::state::SharedState;
use crate::validation::schemas::FORGOT_PASSWORD;
use crate::validation::Schema;

pub const RESET_LINK_MESSAGE: &str = "If that email is registered, a reset link has been sent.";

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    jar: CookieJar,
    headers: HeaderMap,
    body: Bytes,
) -> (CookieJar, Result<Json<MessageResponse>, AppError>) {
    let (jar, session) = FormSession::resolve(jar);
    let result = request_reset(&state, addr, &session, &headers, body).await;
    (jar, result)
}

async fn request_reset(
    state: &SharedState,
    addr: SocketAddr,
    session: &FormSession,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let ip = super::client_ip(state, headers, addr);
    let input = super::intake(state, FormKind::ForgotPassword, ip, headers, body).await?;

    let request = match FORGOT_PASSWORD.decode(&input) {
        Ok(request) => request,
        Err(err) => {
            let fields = err.field_errors();
            state.form_states.put(
                FormKind::ForgotPassword,
                session,
                FormState::rejected(input.without_file_data(), fields.clone()),
            );
            return Err(AppError::Validation(fields));
        }
    };

    // Same answer whether or not the address is known. Delivery is not wired up.
    tracing::info!("Password reset requested for an address at {}", request.domain());

    state.form_states.put(
        FormKind::ForgotPassword,
        session,
        FormState::succeeded(RESET_LINK_MESSAGE),
    );

    Ok(Json(MessageResponse {
        success: true,
        message: RESET_LINK_MESSAGE.to_string(),
    }))
}

pub async fn forgot_password_form(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Json<FormState> {
    Json(
        FormSession::from_jar(&jar)
            .map(|session| state.form_states.get(FormKind::ForgotPassword, &session))
            .unwrap_or_default(),
    )
}
