use std::collections::BTreeMap;

use axum::http::HeaderMap;
use bytes::Bytes;
use serde_json::Value;

use crate::models::UploadedFile;
use crate::validation::RawValue;

/// Parse a request body into raw form input based on its Content-Type.
pub async fn parse_request(headers: &HeaderMap, body: Bytes) -> Result<RawValue, String> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    match content_type {
        Some(ct) if ct.contains("multipart/form-data") => parse_multipart(ct, body).await,
        _ => parse_body(content_type, &body),
    }
}

/// Parse a non-multipart body.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<RawValue, String> {
    let ct = content_type.unwrap_or("application/json");

    if ct.contains("application/json") {
        serde_json::from_slice::<Value>(body)
            .map(RawValue::from)
            .map_err(|e| format!("Invalid JSON: {e}"))
    } else if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)
    } else {
        Err(format!("Unsupported content type: {ct}"))
    }
}

fn parse_form_urlencoded(body: &[u8]) -> Result<RawValue, String> {
    std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;

    let mut form = FormBuilder::default();
    for (k, v) in form_urlencoded::parse(body) {
        form.push(&k, RawValue::Text(v.into_owned()));
    }
    Ok(form.finish())
}

/// Parse multipart form data using multer. Parts with a file name become
/// uploaded files; a file input left empty by the browser is skipped.
pub async fn parse_multipart(content_type: &str, body: Bytes) -> Result<RawValue, String> {
    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = FormBuilder::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let name = field.name().unwrap_or("unknown").to_string();

        if let Some(file_name) = field.file_name().map(|s| s.to_string()) {
            let declared = field.content_type().map(|m| m.to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| format!("File read error: {e}"))?;

            if data.is_empty() && file_name.is_empty() {
                continue;
            }

            let file_name = (!file_name.is_empty()).then_some(file_name);
            let file = UploadedFile::from_upload(file_name, declared.as_deref(), data);
            form.push(&name, RawValue::File(file));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| format!("Field read error: {e}"))?;
            form.push(&name, RawValue::Text(value));
        }
    }

    Ok(form.finish())
}

/// Groups repeated form keys into lists. A `name[]` key is always a list.
#[derive(Default)]
struct FormBuilder {
    fields: BTreeMap<String, RawValue>,
}

impl FormBuilder {
    fn push(&mut self, key: &str, value: RawValue) {
        let (key, force_list) = match key.strip_suffix("[]") {
            Some(stripped) => (stripped, true),
            None => (key, false),
        };

        match self.fields.remove(key) {
            None if force_list => {
                self.fields.insert(key.to_string(), RawValue::List(vec![value]));
            }
            None => {
                self.fields.insert(key.to_string(), value);
            }
            Some(RawValue::List(mut items)) => {
                items.push(value);
                self.fields.insert(key.to_string(), RawValue::List(items));
            }
            Some(existing) => {
                self.fields
                    .insert(key.to_string(), RawValue::List(vec![existing, value]));
            }
        }
    }

    fn finish(self) -> RawValue {
        RawValue::Map(self.fields)
    }
}
