//! HTTP error translation
//!
//! The only place pipeline errors become user-visible responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::document::DocumentError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Document(e) => match e {
                DocumentError::DocumentNotFound(key) => (
                    StatusCode::NOT_FOUND,
                    "not_found",
                    format!("Document not found: {}", key),
                ),
                DocumentError::DocumentUnreadable(_) => {
                    tracing::warn!("Unreadable document: {}", e);
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "unreadable_document",
                        "Document could not be parsed as a PDF".to_string(),
                    )
                }
                DocumentError::RenderFailed(_) => {
                    tracing::error!("Render failed: {}", e);
                    (
                        StatusCode::BAD_GATEWAY,
                        "render_failed",
                        "Failed to render highlighted document".to_string(),
                    )
                }
                DocumentError::InvalidRect(_) => {
                    tracing::error!("Render invoked without a match (bug): {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal_error",
                        "An internal error occurred".to_string(),
                    )
                }
                DocumentError::Storage(_) | DocumentError::IoError(_) => {
                    tracing::error!("Storage error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "storage_error",
                        "Storage error".to_string(),
                    )
                }
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.parts().0
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = self.parts();

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}
