use thiserror::Error;

use crate::der::DerError;

/// Errors raised while turning a fetched body into a set of revoked serials
#[derive(Error, Debug)]
pub enum CrlError {
    #[error(transparent)]
    Der(#[from] DerError),

    #[error("invalid PEM armor: {0}")]
    Pem(String),

    #[error("invalid base64 in PEM body: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("could not read CRL structure ({0})")]
    Structure(String),
}

impl CrlError {
    pub(crate) fn structure(reason: impl Into<String>) -> Self {
        CrlError::Structure(reason.into())
    }
}

/// Convenient Result type alias
pub type CrlResult<T> = Result<T, CrlError>;
