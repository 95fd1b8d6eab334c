//! HTTP client for the backend auth endpoints.

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use v7mon_core::endpoint;

use crate::credential::Credential;
use crate::error::{AuthError, AuthResult};

/// Default timeout for auth requests. Kept short so a dead auth backend
/// surfaces quickly in the UI.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Access-token lifetime assumed when the backend omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: i64 = 900;

/// Login request body (backend expects email/password field names).
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    #[serde(rename = "email")]
    identifier: &'a str,
    #[serde(rename = "password")]
    secret: &'a str,
}

/// Refresh and logout both carry only the refresh token.
#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
    user_id: String,
    email: String,
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    DEFAULT_EXPIRES_IN_SECS
}

/// Client for login, token refresh and logout.
pub struct AuthClient {
    http: Client,
    base_url: String,
}

impl AuthClient {
    /// Create a client with the default timeout.
    ///
    /// # Arguments
    /// * `base_url` - API base URL (e.g. "http://localhost:8000/api/v1")
    pub fn new(base_url: impl Into<String>) -> AuthResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> AuthResult<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            AuthError::ServiceUnavailable(format!("Failed to create HTTP client: {e}"))
        })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchange identifier/secret for a credential.
    ///
    /// Never mutates session state: the caller decides whether to store
    /// the returned credential.
    pub async fn login(&self, identifier: &str, secret: &str) -> AuthResult<Credential> {
        let request = LoginRequest { identifier, secret };

        let response = self
            .http
            .post(self.url(endpoint::LOGIN.path))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if is_rejected(status) {
            debug!(status = status.as_u16(), "Login rejected by backend");
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::ServiceUnavailable(format!(
                "HTTP {status}: {body}"
            )));
        }

        let body: LoginResponse = response.json().await.map_err(|e| {
            AuthError::ServiceUnavailable(format!("Malformed login response: {e}"))
        })?;

        let now = Utc::now();
        let credential = Credential {
            access_token: body.access_token,
            refresh_token: body.refresh_token,
            user_id: body.user_id,
            email: body.email,
            username: body.username,
            issued_at: now,
            expires_at: now + chrono::Duration::seconds(body.expires_in),
        };

        info!(user_id = %credential.user_id, "Login succeeded");
        Ok(credential)
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Returns `InvalidCredentials` when the refresh token itself is
    /// expired or revoked (the session must re-login).
    pub async fn refresh(&self, credential: &Credential) -> AuthResult<Credential> {
        let request = RefreshRequest {
            refresh_token: &credential.refresh_token,
        };

        let response = self
            .http
            .post(self.url(endpoint::REFRESH.path))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if is_rejected(status) {
            debug!(status = status.as_u16(), "Refresh token rejected");
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::ServiceUnavailable(format!(
                "HTTP {status}: {body}"
            )));
        }

        let body: RefreshResponse = response.json().await.map_err(|e| {
            AuthError::ServiceUnavailable(format!("Malformed refresh response: {e}"))
        })?;

        let now = Utc::now();
        let mut refreshed = credential.clone();
        refreshed.access_token = body.access_token;
        refreshed.issued_at = now;
        refreshed.expires_at = now + chrono::Duration::seconds(body.expires_in);

        debug!(user_id = %refreshed.user_id, expires_at = %refreshed.expires_at, "Access token refreshed");
        Ok(refreshed)
    }

    /// Best-effort server-side logout. Failures are logged, never surfaced:
    /// the local credential is dropped either way.
    pub async fn logout(&self, credential: &Credential) {
        let request = RefreshRequest {
            refresh_token: &credential.refresh_token,
        };

        let result = self
            .http
            .post(self.url(endpoint::LOGOUT.path))
            .json(&request)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!(user_id = %credential.user_id, "Logged out");
            }
            Ok(response) => {
                warn!(status = response.status().as_u16(), "Logout request rejected");
            }
            Err(e) => {
                warn!(error = %e, "Logout request failed");
            }
        }
    }
}

/// Statuses that mean the submitted credentials/token were rejected,
/// as opposed to the service being broken.
fn is_rejected(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST
            | StatusCode::UNAUTHORIZED
            | StatusCode::FORBIDDEN
            | StatusCode::UNPROCESSABLE_ENTITY
    )
}

fn transport_error(e: reqwest::Error) -> AuthError {
    if e.is_timeout() {
        AuthError::ServiceUnavailable("Request timed out".to_string())
    } else {
        AuthError::ServiceUnavailable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_wire_format() {
        let request = LoginRequest {
            identifier: "user@example.com",
            secret: "hunter2",
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"email":"user@example.com","password":"hunter2"}"#
        );
    }

    #[test]
    fn test_login_response_defaults_expiry() {
        let body: LoginResponse = serde_json::from_str(
            r#"{"access_token":"a","refresh_token":"r","user_id":"u-1","email":"user@example.com"}"#,
        )
        .unwrap();
        assert_eq!(body.expires_in, DEFAULT_EXPIRES_IN_SECS);
        assert!(body.username.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = AuthClient::new("http://localhost:8000/api/v1/").unwrap();
        assert_eq!(
            client.url(endpoint::LOGIN.path),
            "http://localhost:8000/api/v1/auth/login"
        );
    }
}
