use thiserror::Error;

/// Failures detected before a request reaches the revocation checker
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppError {
    #[error("invalid JSON body")]
    InvalidJsonBody,
    #[error("Not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
}
