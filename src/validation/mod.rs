pub mod errors;
pub mod rules;
pub mod schemas;
pub mod value;

use std::fmt;

use serde::Serialize;

pub use errors::FieldErrors;
pub use value::RawValue;

/// One segment of a field path: an object key or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{key}"),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A single violated rule, keyed by the path of the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Path segments joined with `.`, e.g. `categories.1`. Empty for the root.
    pub fn path_string(&self) -> String {
        self.path
            .iter()
            .map(|segment| segment.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Failed decode: every violated rule, in schema field order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn field_errors(&self) -> FieldErrors {
        FieldErrors::from_issues(&self.issues)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation issue(s)", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "; {}: {}", issue.path_string(), issue.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A declarative description of a form that turns raw input into a typed value.
pub trait Schema: Send + Sync {
    type Output;

    fn decode(&self, input: &RawValue) -> Result<Self::Output, ValidationError>;
}

/// Accumulates issues across independently evaluated fields.
#[derive(Debug, Default)]
pub struct IssueCollector {
    issues: Vec<ValidationIssue>,
}

impl IssueCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a single-message field chain.
    pub fn field<T>(&mut self, name: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.push(vec![name.into()], message);
                None
            }
        }
    }

    pub fn push(&mut self, path: Vec<PathSegment>, message: impl Into<String>) {
        self.issues.push(ValidationIssue::new(path, message));
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_error(self) -> ValidationError {
        ValidationError::new(self.issues)
    }
}

/// Look up the object fields of a decode input, or fail with a root issue.
pub(crate) fn expect_object(
    input: &RawValue,
) -> Result<&std::collections::BTreeMap<String, RawValue>, ValidationError> {
    input.as_map().ok_or_else(|| {
        ValidationError::new(vec![ValidationIssue::new(
            Vec::new(),
            "Expected a form submission.",
        )])
    })
}
