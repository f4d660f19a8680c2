use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::models::UploadedFile;

/// Untyped form input as it arrives from a JSON, urlencoded or multipart body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Text(String),
    /// Numbers and booleans from JSON bodies.
    Scalar(Value),
    List(Vec<RawValue>),
    Map(BTreeMap<String, RawValue>),
    File(UploadedFile),
}

impl RawValue {
    pub fn empty_map() -> Self {
        RawValue::Map(BTreeMap::new())
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, RawValue>> {
        match self {
            RawValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Insert a field into a map value. No-op on other variants.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        if let RawValue::Map(map) = self {
            map.insert(key.into(), value.into());
        }
    }

    /// Copy with uploaded bytes dropped, keeping file metadata.
    pub fn without_file_data(&self) -> RawValue {
        match self {
            RawValue::File(file) => RawValue::File(UploadedFile {
                data: bytes::Bytes::new(),
                ..file.clone()
            }),
            RawValue::List(items) => {
                RawValue::List(items.iter().map(RawValue::without_file_data).collect())
            }
            RawValue::Map(map) => RawValue::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.without_file_data()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::String(s) => RawValue::Text(s),
            Value::Array(items) => RawValue::List(items.into_iter().map(RawValue::from).collect()),
            Value::Object(obj) => RawValue::Map(
                obj.into_iter()
                    .map(|(k, v)| (k, RawValue::from(v)))
                    .collect(),
            ),
            scalar => RawValue::Scalar(scalar),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<UploadedFile> for RawValue {
    fn from(file: UploadedFile) -> Self {
        RawValue::File(file)
    }
}
