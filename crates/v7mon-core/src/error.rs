//! Error types for v7mon-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid signal state: {0}")]
    InvalidSignalState(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
