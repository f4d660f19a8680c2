use std::collections::BTreeMap;

use regex::Regex;

use crate::models::UploadedFile;

use super::{IssueCollector, RawValue};

const EXPECTED_STRING: &str = "Expected a string.";
const EXPECTED_LIST: &str = "Expected a list.";
const EXPECTED_FILE: &str = "Expected a file.";
const SINGLE_FILE: &str = "Only one file can be uploaded.";

#[derive(Debug, Clone)]
pub enum TextRule {
    NonEmpty { message: String },
    Pattern { regex: Regex, message: String },
    MaxWords { max: usize, message: String },
}

impl TextRule {
    fn check(&self, value: &str) -> Result<(), String> {
        let (ok, message) = match self {
            TextRule::NonEmpty { message } => (!value.is_empty(), message),
            TextRule::Pattern { regex, message } => (regex.is_match(value), message),
            TextRule::MaxWords { max, message } => {
                (value.split_whitespace().count() <= *max, message)
            }
        };

        if ok { Ok(()) } else { Err(message.clone()) }
    }
}

/// A string field: optional trimming followed by a short-circuiting rule chain.
#[derive(Debug, Clone, Default)]
pub struct TextChain {
    trim: bool,
    rules: Vec<TextRule>,
}

impl TextChain {
    pub fn trimmed() -> Self {
        Self {
            trim: true,
            rules: Vec::new(),
        }
    }

    pub fn non_empty(mut self, message: impl Into<String>) -> Self {
        self.rules.push(TextRule::NonEmpty {
            message: message.into(),
        });
        self
    }

    pub fn pattern(mut self, regex: Regex, message: impl Into<String>) -> Self {
        self.rules.push(TextRule::Pattern {
            regex,
            message: message.into(),
        });
        self
    }

    pub fn max_words(mut self, max: usize, message: impl Into<String>) -> Self {
        self.rules.push(TextRule::MaxWords {
            max,
            message: message.into(),
        });
        self
    }

    /// Missing and null values decode as the empty string so the chain's
    /// non-empty rule reports them.
    pub fn decode(&self, value: Option<&RawValue>) -> Result<String, String> {
        let raw = match value {
            None | Some(RawValue::Null) => "",
            Some(RawValue::Text(s)) => s.as_str(),
            Some(_) => return Err(EXPECTED_STRING.to_string()),
        };

        let text = if self.trim { raw.trim() } else { raw };
        for rule in &self.rules {
            rule.check(text)?;
        }

        Ok(text.to_string())
    }
}

#[derive(Debug, Clone)]
pub enum ListRule {
    MinItems { min: usize, message: String },
    MaxItems { max: usize, message: String },
}

impl ListRule {
    fn check(&self, len: usize) -> Result<(), String> {
        match self {
            ListRule::MinItems { min, message } if len < *min => Err(message.clone()),
            ListRule::MaxItems { max, message } if len > *max => Err(message.clone()),
            _ => Ok(()),
        }
    }
}

/// A list of strings. Elements are checked first; length bounds only run
/// once every element has passed.
#[derive(Debug, Clone, Default)]
pub struct ListChain {
    item: TextChain,
    rules: Vec<ListRule>,
}

impl ListChain {
    pub fn of(item: TextChain) -> Self {
        Self {
            item,
            rules: Vec::new(),
        }
    }

    pub fn min_items(mut self, min: usize, message: impl Into<String>) -> Self {
        self.rules.push(ListRule::MinItems {
            min,
            message: message.into(),
        });
        self
    }

    pub fn max_items(mut self, max: usize, message: impl Into<String>) -> Self {
        self.rules.push(ListRule::MaxItems {
            max,
            message: message.into(),
        });
        self
    }

    pub fn decode(
        &self,
        name: &str,
        value: Option<&RawValue>,
        issues: &mut IssueCollector,
    ) -> Option<Vec<String>> {
        let items: Vec<&RawValue> = match value {
            None | Some(RawValue::Null) => Vec::new(),
            Some(RawValue::List(items)) => items.iter().collect(),
            // A form body with a single occurrence of the field.
            Some(single @ RawValue::Text(_)) => vec![single],
            Some(_) => {
                issues.push(vec![name.into()], EXPECTED_LIST);
                return None;
            }
        };

        let mut decoded = Vec::with_capacity(items.len());
        let mut failed = false;
        for (index, item) in items.into_iter().enumerate() {
            match self.item.decode(Some(item)) {
                Ok(value) => decoded.push(value),
                Err(message) => {
                    failed = true;
                    issues.push(vec![name.into(), index.into()], message);
                }
            }
        }

        if failed {
            return None;
        }

        for rule in &self.rules {
            if let Err(message) = rule.check(decoded.len()) {
                issues.push(vec![name.into()], message);
                return None;
            }
        }

        Some(decoded)
    }
}

#[derive(Debug, Clone)]
pub enum FileRule {
    MimeType { accepted: &'static [&'static str], message: String },
    MaxSize { bytes: u64, message: String },
}

impl FileRule {
    fn check(&self, file: &UploadedFile) -> Result<(), String> {
        match self {
            FileRule::MimeType { accepted, message } => {
                let mime = file.mime_essence();
                if accepted.contains(&mime.as_str()) {
                    Ok(())
                } else {
                    Err(message.clone())
                }
            }
            FileRule::MaxSize { bytes, message } if file.size > *bytes => Err(message.clone()),
            FileRule::MaxSize { .. } => Ok(()),
        }
    }
}

/// A single file field, optional unless a required message is set.
#[derive(Debug, Clone, Default)]
pub struct FileChain {
    required: Option<String>,
    rules: Vec<FileRule>,
}

impl FileChain {
    pub fn optional() -> Self {
        Self::default()
    }

    pub fn required(message: impl Into<String>) -> Self {
        Self {
            required: Some(message.into()),
            rules: Vec::new(),
        }
    }

    pub fn mime_type(mut self, accepted: &'static [&'static str], message: impl Into<String>) -> Self {
        self.rules.push(FileRule::MimeType {
            accepted,
            message: message.into(),
        });
        self
    }

    pub fn max_size(mut self, bytes: u64, message: impl Into<String>) -> Self {
        self.rules.push(FileRule::MaxSize {
            bytes,
            message: message.into(),
        });
        self
    }

    pub fn decode(&self, value: Option<&RawValue>) -> Result<Option<UploadedFile>, String> {
        let Some(file) = resolve_file(value)? else {
            return match &self.required {
                Some(message) => Err(message.clone()),
                None => Ok(None),
            };
        };

        for rule in &self.rules {
            rule.check(&file)?;
        }

        Ok(Some(file))
    }
}

/// Turn whatever the body carried for a file field into a file reference.
/// An empty string or empty list means no file was picked.
fn resolve_file(value: Option<&RawValue>) -> Result<Option<UploadedFile>, String> {
    match value {
        None | Some(RawValue::Null) => Ok(None),
        Some(RawValue::Text(s)) if s.is_empty() => Ok(None),
        Some(RawValue::File(file)) => Ok(Some(file.clone())),
        Some(RawValue::Map(map)) => describe_file(map).map(Some),
        Some(RawValue::List(items)) => match items.as_slice() {
            [] => Ok(None),
            [single] => resolve_file(Some(single)),
            _ => Err(SINGLE_FILE.to_string()),
        },
        Some(_) => Err(EXPECTED_FILE.to_string()),
    }
}

/// JSON bodies describe a file as `{"name"?, "type", "size"}`.
fn describe_file(map: &BTreeMap<String, RawValue>) -> Result<UploadedFile, String> {
    let content_type = match map.get("type") {
        Some(RawValue::Text(t)) => t.clone(),
        _ => return Err(EXPECTED_FILE.to_string()),
    };
    let size = match map.get("size") {
        Some(RawValue::Scalar(n)) => n.as_u64().ok_or_else(|| EXPECTED_FILE.to_string())?,
        _ => return Err(EXPECTED_FILE.to_string()),
    };
    let file_name = match map.get("name") {
        Some(RawValue::Text(name)) => Some(name.clone()),
        _ => None,
    };

    Ok(UploadedFile::described(file_name, content_type, size))
}
