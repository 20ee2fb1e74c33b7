use serde::{Deserialize, Serialize};

use super::errors::CheckError;

/// Outcome of one revocation check.
///
/// When `error` is set the check did not reach a verdict and `revoked` is
/// always `false`; callers must look at `error` before trusting `revoked`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub revoked: bool,
    pub serial: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    pub fn verdict(serial: impl Into<String>, revoked: bool) -> Self {
        Self {
            revoked,
            serial: serial.into(),
            error: None,
        }
    }

    pub fn failure(serial: impl Into<String>, error: &CheckError) -> Self {
        Self {
            revoked: false,
            serial: serial.into(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
