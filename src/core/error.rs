//! Error types and error handling for the passage service.
//!
//! This module defines the error types used throughout the
//! application. Protocol-specific error handling (HTTP status codes)
//! is handled in the respective adapter modules.

use thiserror::Error;

/// Result type alias for passage operations
pub type Result<T> = std::result::Result<T, PassageError>;

/// Main error type for the passage service
#[derive(Error, Debug)]
pub enum PassageError {
    #[error("Invalid collection name: {0}")]
    InvalidName(String),

    #[error("Already indexed: {0}")]
    AlreadyIndexed(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Empty document: {0}")]
    EmptyDocument(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upload too large: {0}")]
    UploadTooLarge(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PassageError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, PassageError::CollectionNotFound(_))
    }

    /// Check if this is a conflict error (already exists)
    pub fn is_conflict(&self) -> bool {
        matches!(self, PassageError::AlreadyIndexed(_))
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            PassageError::InvalidName(_)
                | PassageError::InvalidQuery(_)
                | PassageError::InvalidRequest(_)
                | PassageError::Config(_)
        )
    }

    /// Check if the uploaded document itself was unusable
    pub fn is_unprocessable(&self) -> bool {
        matches!(
            self,
            PassageError::Extraction(_)
                | PassageError::EmptyDocument(_)
                | PassageError::UnsupportedFormat(_)
        )
    }
}

impl<T> From<std::sync::PoisonError<T>> for PassageError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        PassageError::Store(format!("lock poisoned: {err}"))
    }
}

impl From<tantivy::TantivyError> for PassageError {
    fn from(err: tantivy::TantivyError) -> Self {
        PassageError::Store(err.to_string())
    }
}
