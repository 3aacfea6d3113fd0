//! Document error types
//!
//! Error taxonomy shared by the extractor, matcher, renderer and artifact cache.
//! Only the HTTP layer turns these into user-visible responses.

use thiserror::Error;

/// Citation pipeline error type
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Document key unknown to the backing store
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Payload could not be parsed as a PDF
    #[error("Document unreadable: {0}")]
    DocumentUnreadable(String),

    /// Extraction or rendering failed or ran past the request timeout
    #[error("Render failed: {0}")]
    RenderFailed(String),

    /// Render was invoked without a usable rectangle
    #[error("Invalid highlight rectangle: {0}")]
    InvalidRect(String),

    /// Document or artifact storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error (std::io::Error)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Alias for Result (used by the route layer)
pub type DocumentResult<T> = Result<T>;

impl From<mupdf::Error> for DocumentError {
    fn from(err: mupdf::Error) -> Self {
        DocumentError::DocumentUnreadable(err.to_string())
    }
}

impl From<lopdf::Error> for DocumentError {
    fn from(err: lopdf::Error) -> Self {
        DocumentError::RenderFailed(err.to_string())
    }
}

impl DocumentError {
    /// Whether the caller may retry the whole request
    ///
    /// Rendering is idempotent, so render failures (timeouts included) are
    /// retryable. Missing or corrupt documents never are.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DocumentError::RenderFailed(_))
    }
}
