use bytes::Bytes;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// A resolved file reference. Multipart uploads carry their bytes; files
/// described in a JSON body only carry metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedFile {
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(skip)]
    pub data: Bytes,
}

impl UploadedFile {
    /// Build from uploaded bytes. The MIME type is sniffed from the content
    /// when recognised, falling back to the declared part type.
    pub fn from_upload(file_name: Option<String>, declared_type: Option<&str>, data: Bytes) -> Self {
        let content_type = infer::get(&data)
            .map(|kind| kind.mime_type().to_string())
            .or_else(|| declared_type.map(|t| t.to_string()))
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let digest = Sha256::digest(&data);

        Self {
            file_name,
            content_type,
            size: data.len() as u64,
            sha256: Some(hex::encode(digest)),
            data,
        }
    }

    pub fn described(file_name: Option<String>, content_type: String, size: u64) -> Self {
        Self {
            file_name,
            content_type,
            size,
            sha256: None,
            data: Bytes::new(),
        }
    }

    /// Lowercased MIME type without parameters, e.g. `image/png`.
    pub fn mime_essence(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase()
    }
}
