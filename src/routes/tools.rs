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
use crate::submission::pipeline::{self, Outcome};

#[derive(Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

pub async fn submit(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    jar: CookieJar,
    headers: HeaderMap,
    body: Bytes,
) -> (CookieJar, Result<Json<SubmitResponse>, AppError>) {
    let (jar, session) = FormSession::resolve(jar);
    let result = accept(&state, addr, &session, &headers, body).await;
    (jar, result)
}

async fn accept(
    state: &SharedState,
    addr: SocketAddr,
    session: &FormSession,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Json<SubmitResponse>, AppError> {
    let ip = super::client_ip(state, headers, addr);
    let input = super::intake(state, FormKind::ToolSubmission, ip, headers, body).await?;

    match pipeline::run(state.store.as_ref(), &input).await? {
        Outcome::Succeeded { stored, message } => {
            tracing::info!("Tool submission {} stored", stored.id);
            state.form_states.put(
                FormKind::ToolSubmission,
                session,
                FormState::succeeded(message.clone()),
            );
            Ok(Json(SubmitResponse {
                success: true,
                message,
            }))
        }
        Outcome::Rejected(fields) => {
            state.form_states.put(
                FormKind::ToolSubmission,
                session,
                FormState::rejected(input.without_file_data(), fields.clone()),
            );
            Err(AppError::Validation(fields))
        }
    }
}

pub async fn form_state(State(state): State<SharedState>, jar: CookieJar) -> Json<FormState> {
    Json(
        FormSession::from_jar(&jar)
            .map(|session| state.form_states.get(FormKind::ToolSubmission, &session))
            .unwrap_or_default(),
    )
}
