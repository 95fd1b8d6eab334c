//! API error types.

use thiserror::Error;

/// Classified API call failures.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend returned HTTP 401: the access token is absent, invalid
    /// or expired. The caller must re-authenticate; the client never
    /// retries or refreshes on its own.
    #[error("Not authenticated")]
    Unauthenticated,

    /// Network failure or timeout.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Non-2xx, non-401 response from the backend.
    #[error("Backend error (HTTP {status}): {message}")]
    Backend { status: u16, message: String },

    /// Response body was not the expected JSON shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;
