//! Error types for Pillbox core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.
//!
//! Only `Validation` and `NotFound` ever reject a mutation. Persistence and
//! dispatcher failures are recoverable and are reported alongside a mutation
//! that has already been applied in memory (see [`crate::Outcome`]).

use thiserror::Error;

/// Result type alias for Pillbox operations.
pub type Result<T> = std::result::Result<T, PillboxError>;

/// Core error type for Pillbox operations.
#[derive(Debug, Error)]
pub enum PillboxError {
    /// Medication or schedule data failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced medication or schedule does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persistent store read or write failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Notification dispatcher rejected an operation
    #[error("Dispatcher error: {0}")]
    Dispatcher(String),

    /// Device link rejected a transition
    #[error("Device error: {0}")]
    Device(String),

    /// Invalid user input (unparseable time, weekday, etc.)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error (fallback)
    #[error("{0}")]
    Other(String),
}

impl PillboxError {
    /// Whether this error rejected a mutation outright (nothing was applied).
    pub fn is_rejection(&self) -> bool {
        matches!(self, PillboxError::Validation(_) | PillboxError::NotFound(_))
    }
}

impl From<std::io::Error> for PillboxError {
    fn from(err: std::io::Error) -> Self {
        PillboxError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for PillboxError {
    fn from(err: serde_json::Error) -> Self {
        PillboxError::Persistence(err.to_string())
    }
}
