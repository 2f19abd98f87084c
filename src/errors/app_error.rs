use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::core::transcribe::TranscriptionError;

/// Application error type
///
/// The response body carries the user-facing message so that callers can tell
/// input-validation failures (400) apart from engine failures (500). Messages
/// are component-level descriptions, never internal stack detail.
#[derive(Debug)]
pub enum AppError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg)
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InternalServerError(msg) => write!(f, "Internal server error: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            AppError::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<TranscriptionError> for AppError {
    fn from(err: TranscriptionError) -> Self {
        match err {
            TranscriptionError::InvalidFormat(_) | TranscriptionError::EmptyAudio => {
                AppError::BadRequest(err.to_string())
            }
            TranscriptionError::TranscriptionFailed(_) => {
                AppError::InternalServerError(err.to_string())
            }
        }
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
