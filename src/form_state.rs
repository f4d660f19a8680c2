use std::fmt;
use std::time::{Duration, Instant};

use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use dashmap::DashMap;
use serde::Serialize;

use crate::validation::{FieldErrors, RawValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    ToolSubmission,
    ForgotPassword,
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormKind::ToolSubmission => f.write_str("tool_submission"),
            FormKind::ForgotPassword => f.write_str("forgot_password"),
        }
    }
}

/// What a form needs to re-render: the values last posted, one message per
/// invalid field, and whether the last attempt went through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormState {
    pub values: RawValue,
    pub fields: FieldErrors,
    pub submitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormState {
    pub fn rejected(values: RawValue, fields: FieldErrors) -> Self {
        Self {
            values,
            fields,
            submitted: false,
            message: None,
        }
    }

    /// A successful submission resets the form.
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            submitted: true,
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            values: RawValue::empty_map(),
            fields: FieldErrors::new(),
            submitted: false,
            message: None,
        }
    }
}

pub const FORM_SESSION_COOKIE: &str = "form_session";

/// Opaque per-browser token that scopes stored form state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormSession(String);

impl FormSession {
    pub fn generate() -> Self {
        let bytes: [u8; 32] = rand::random();
        Self(hex::encode(bytes))
    }

    /// Accepts only tokens shaped like the ones `generate` hands out.
    pub fn parse(value: &str) -> Option<Self> {
        (value.len() == 64 && value.bytes().all(|b| b.is_ascii_hexdigit()))
            .then(|| Self(value.to_ascii_lowercase()))
    }

    pub fn from_jar(jar: &CookieJar) -> Option<Self> {
        jar.get(FORM_SESSION_COOKIE)
            .and_then(|cookie| Self::parse(cookie.value()))
    }

    /// Reuse the caller's session or start a new one, and (re)issue the cookie.
    pub fn resolve(jar: CookieJar) -> (CookieJar, Self) {
        let session = Self::from_jar(&jar).unwrap_or_else(Self::generate);
        let cookie = Cookie::build((FORM_SESSION_COOKIE, session.0.clone()))
            .path("/api/v1")
            .http_only(true)
            .secure(true)
            .same_site(SameSite::Lax)
            .build();
        (jar.add(cookie), session)
    }
}

/// Last form state per browser session and form, expired after a TTL.
pub struct FormStateStore {
    entries: DashMap<(FormKind, FormSession), (FormState, Instant)>,
    ttl: Duration,
}

impl FormStateStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn put(&self, form: FormKind, session: &FormSession, state: FormState) {
        self.entries
            .insert((form, session.clone()), (state, Instant::now()));
    }

    /// The stored state, or the empty default when nothing fresh is stored.
    pub fn get(&self, form: FormKind, session: &FormSession) -> FormState {
        match self.entries.get(&(form, session.clone())) {
            Some(entry) if entry.value().1.elapsed() <= self.ttl => entry.value().0.clone(),
            _ => FormState::default(),
        }
    }

    pub fn cleanup(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, (_, stored_at)| stored_at.elapsed() <= ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
