use std::fmt;

use uuid::Uuid;

use crate::validation::schemas::TOOL_SUBMISSION;
use crate::validation::{FieldErrors, RawValue, Schema};

use super::store::{StoreError, StoredSubmission, SubmissionStore};

pub const SUCCESS_MESSAGE: &str = "Tool submitted successfully.";

/// Stages of a single submission attempt.
///
/// `Received -> Validating -> Validated -> Persisting -> Succeeded`, or
/// `Received -> Validating -> Rejected`. There are no retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Validating,
    Validated,
    Persisting,
    Succeeded,
    Rejected,
}

impl Stage {
    pub fn can_advance_to(self, next: Stage) -> bool {
        matches!(
            (self, next),
            (Stage::Received, Stage::Validating)
                | (Stage::Validating, Stage::Validated)
                | (Stage::Validating, Stage::Rejected)
                | (Stage::Validated, Stage::Persisting)
                | (Stage::Persisting, Stage::Succeeded)
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Validating => "validating",
            Stage::Validated => "validated",
            Stage::Persisting => "persisting",
            Stage::Succeeded => "succeeded",
            Stage::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

struct Attempt {
    id: Uuid,
    stage: Stage,
}

impl Attempt {
    fn new() -> Self {
        let attempt = Self {
            id: Uuid::now_v7(),
            stage: Stage::Received,
        };
        tracing::debug!(attempt = %attempt.id, "Submission {}", attempt.stage);
        attempt
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "invalid submission transition {} -> {next}",
            self.stage
        );
        self.stage = next;
        tracing::debug!(attempt = %self.id, "Submission {next}");
    }
}

#[derive(Debug)]
pub enum Outcome {
    Succeeded {
        stored: StoredSubmission,
        message: String,
    },
    Rejected(FieldErrors),
}

/// Validate a raw tool submission and hand it to the store.
///
/// A rejected submission never reaches the store. A store failure is
/// returned as an error, distinct from a rejection.
pub async fn run(store: &dyn SubmissionStore, input: &RawValue) -> Result<Outcome, StoreError> {
    let mut attempt = Attempt::new();

    attempt.advance(Stage::Validating);
    let submission = match TOOL_SUBMISSION.decode(input) {
        Ok(submission) => submission,
        Err(err) => {
            attempt.advance(Stage::Rejected);
            tracing::info!(attempt = %attempt.id, "Submission rejected: {err}");
            return Ok(Outcome::Rejected(err.field_errors()));
        }
    };
    attempt.advance(Stage::Validated);

    attempt.advance(Stage::Persisting);
    let stored = store.save(&submission).await.inspect_err(|e| {
        tracing::error!(attempt = %attempt.id, "Failed to store submission: {e}");
    })?;
    attempt.advance(Stage::Succeeded);

    Ok(Outcome::Succeeded {
        stored,
        message: SUCCESS_MESSAGE.to_string(),
    })
}
