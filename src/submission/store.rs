use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::Submission;

#[derive(Debug, Clone, Serialize)]
pub struct StoredSubmission {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct StoreError {
    pub message: String,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StoreError {}

impl From<String> for StoreError {
    fn from(s: String) -> Self {
        StoreError { message: s }
    }
}

impl From<&str> for StoreError {
    fn from(s: &str) -> Self {
        StoreError {
            message: s.to_string(),
        }
    }
}

/// Where validated submissions go.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn save(&self, submission: &Submission) -> Result<StoredSubmission, StoreError>;
}

/// Accepts every submission and only logs it. There is no backing storage.
pub struct LogStore;

#[async_trait]
impl SubmissionStore for LogStore {
    async fn save(&self, submission: &Submission) -> Result<StoredSubmission, StoreError> {
        let stored = StoredSubmission {
            id: Uuid::now_v7(),
            received_at: Utc::now(),
        };

        tracing::info!(
            id = %stored.id,
            name = %submission.name,
            website = %submission.website,
            pricing = %submission.pricing,
            primary_category = submission.primary_category().unwrap_or(""),
            secondary_categories = ?submission.secondary_categories(),
            has_logo = submission.logo.is_some(),
            screenshot_bytes = submission.homepage_screenshot.size,
            "Tool submission accepted"
        );

        Ok(stored)
    }
}
