use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ValidationIssue;

/// Field path -> message, one message per field, ready for inline display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the mapping from ordered issues. The first issue reported for a
    /// path wins; later ones for the same path are dropped.
    pub fn from_issues(issues: &[ValidationIssue]) -> Self {
        let mut errors = Self::new();
        for issue in issues {
            errors.insert_first(issue.path_string(), issue.message.clone());
        }
        errors
    }

    /// Insert unless the path already carries a message.
    pub fn insert_first(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
