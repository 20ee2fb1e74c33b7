use thiserror::Error;

use super::ports::FetchError;
use crate::pki::CrlError;

/// Reasons a check cannot reach a verdict.
///
/// The display strings are returned verbatim to callers.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("missing or invalid serial")]
    MissingSerial,

    #[error("missing listUrl")]
    MissingListUrl,

    #[error("failed to fetch list: {0}")]
    Fetch(#[from] FetchError),

    #[error("list URL returned {0}")]
    Status(u16),

    #[error("CRL parse error: {0}")]
    Crl(#[from] CrlError),

    #[error("invalid JSON list: {0}")]
    JsonList(String),
}

impl From<serde_json::Error> for CheckError {
    fn from(error: serde_json::Error) -> Self {
        CheckError::JsonList(error.to_string())
    }
}
