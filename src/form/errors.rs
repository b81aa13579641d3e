//! # Form Errors
//!
//! Errors raised while handing a validated record to its consumers.
//! Validation failures are not errors here; see `schema::FieldErrors`.

use thiserror::Error;

/// Error type a host callback may return
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for registry store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Registry store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing file could not be read or written
    #[error("Registry I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value is not valid JSON for the expected type
    #[error("Registry serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A valid record that could not be handed off
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The host callback returned an error
    #[error("Registration handler failed: {0}")]
    Handler(#[source] HandlerError),

    /// The host callback panicked
    #[error("Registration handler panicked: {0}")]
    HandlerPanicked(String),

    /// Writing to the registry store failed
    #[error("Registry write failed: {0}")]
    Store(#[from] StoreError),
}

impl SubmissionError {
    /// Stable code for logs
    pub fn code(&self) -> &'static str {
        match self {
            SubmissionError::Handler(_) => "REG_HANDLER_FAILED",
            SubmissionError::HandlerPanicked(_) => "REG_HANDLER_PANICKED",
            SubmissionError::Store(_) => "REG_STORE_FAILED",
        }
    }
}
