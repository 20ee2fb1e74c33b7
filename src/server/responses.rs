use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::server::errors::AppError;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidJsonBody => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // A rejected body still reads as a negative check result
        let body = match self {
            AppError::InvalidJsonBody => json!({ "revoked": false, "error": self.to_string() }),
            AppError::NotFound | AppError::MethodNotAllowed => json!({ "error": self.to_string() }),
        };
        (self.status(), Json(body)).into_response()
    }
}
