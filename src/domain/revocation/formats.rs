//! Format detection and matching for the non-CRL list encodings

use serde_json::Value;
use url::Url;

use super::errors::CheckError;
use crate::pki::crl::pem;

/// Keys that may hold the serial array in a JSON object body, in lookup order
const JSON_LIST_KEYS: [&str; 3] = ["revoked", "serials", "list"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    Json,
    Text,
    Binary,
}

impl ListFormat {
    /// Picks the decoder for a fetched body.
    ///
    /// The declared content type wins; the URL extension decides only when
    /// it is absent. An octet stream is always a CRL.
    pub fn detect(content_type: Option<&str>, list_url: &str, body: &[u8]) -> Self {
        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty());
        let extension = url_extension(list_url);

        let format = match mime.as_deref() {
            Some(ct) if ct.contains("json") => ListFormat::Json,
            Some(ct) if ct.contains("x509") || ct.contains("pkix-crl") => ListFormat::Binary,
            _ if extension.as_deref() == Some("crl") => ListFormat::Binary,
            Some("application/octet-stream") => ListFormat::Binary,
            None => match extension.as_deref() {
                Some("json") => ListFormat::Json,
                Some("txt") => ListFormat::Text,
                _ => ListFormat::Binary,
            },
            Some(ct) if !ct.contains("text") => ListFormat::Binary,
            Some(_) => ListFormat::Text,
        };

        // PEM CRLs are often served as text/plain
        if format == ListFormat::Text && pem::is_pem_crl(body) {
            return ListFormat::Binary;
        }
        format
    }
}

/// Lowercase extension of the URL path, query and fragment excluded
fn url_extension(list_url: &str) -> Option<String> {
    let path = match Url::parse(list_url) {
        Ok(url) => url.path().to_string(),
        Err(_) => list_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    let file = path.rsplit('/').next()?;
    let (_, ext) = file.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

/// Case-insensitive, trimmed comparison used by the JSON and text paths
fn fold(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Tests membership of `serial` in a JSON list body.
///
/// Accepts a bare array or an object holding the array under one of
/// [`JSON_LIST_KEYS`]. Entries are strings or objects with a `serial` field.
pub fn json_contains(body: &[u8], serial: &str) -> Result<bool, CheckError> {
    let document: Value = serde_json::from_slice(body)?;

    let entries = match &document {
        Value::Array(entries) => entries,
        Value::Object(map) => JSON_LIST_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .ok_or_else(|| {
                CheckError::JsonList(format!(
                    "expected an array under one of {}",
                    JSON_LIST_KEYS.join(", ")
                ))
            })?,
        _ => {
            return Err(CheckError::JsonList(
                "expected an array or an object".into(),
            ));
        }
    };

    let wanted = fold(serial);
    Ok(entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(s) => Some(s.as_str()),
            Value::Object(obj) => obj.get("serial").and_then(Value::as_str),
            _ => None,
        })
        .any(|candidate| fold(candidate) == wanted))
}

/// Tests membership of `serial` in a newline separated list
pub fn text_contains(body: &[u8], serial: &str) -> bool {
    let wanted = fold(serial);
    String::from_utf8_lossy(body)
        .lines()
        .any(|line| fold(line) == wanted)
}
