use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use picstore_core::CoreError;

/// Handler error, rendered as a plain-text body.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    /// Download of a missing file; reported as a server error.
    FileNotFound,
    Internal(String),
    /// Malformed, truncated or oversized multipart body.
    Multipart(MultipartError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::FileNotFound => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "file not found".to_string(),
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::Multipart(e) => {
                tracing::warn!("Upload rejected: {}", e.body_text());
                (e.status(), e.body_text())
            }
        };

        (status, message).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidName(name) => AppError::BadRequest(format!("invalid name: {name}")),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Multipart(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}
