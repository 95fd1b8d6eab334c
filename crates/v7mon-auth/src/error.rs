//! Auth error types.

use thiserror::Error;

/// Classified authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend rejected the identifier/secret or refresh token.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The auth service could not be reached or failed server-side.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

pub type AuthResult<T> = Result<T, AuthError>;
