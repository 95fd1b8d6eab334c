//! Session credential.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// A signed token pair identifying an authenticated session.
///
/// Created on successful login, replaced on refresh, discarded on logout
/// or refresh failure. Held in memory only for the lifetime of the session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Short-lived access token, sent as a bearer header on every API call.
    pub access_token: String,
    /// Longer-lived refresh token, exchanged for a new access token.
    pub refresh_token: String,
    /// User identifier assigned by the backend.
    pub user_id: String,
    /// Login identifier (email).
    pub email: String,
    /// Display name, when the backend provides one.
    pub username: Option<String>,
    /// When the access token was issued.
    pub issued_at: DateTime<Utc>,
    /// When the access token expires.
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// Check expiry against the current time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Check expiry against a given instant. Boundary inclusive: the
    /// credential is expired exactly when `now >= expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// True when the access token expires within `margin` from now.
    /// Used by the poller to refresh proactively before a cycle.
    pub fn expires_within(&self, margin: Duration) -> bool {
        self.expires_within_at(margin, Utc::now())
    }

    /// Margin check against a given instant.
    pub fn expires_within_at(&self, margin: Duration, now: DateTime<Utc>) -> bool {
        match (self.expires_at - now).to_std() {
            Ok(remaining) => remaining <= margin,
            // Negative remaining time: already expired.
            Err(_) => true,
        }
    }
}

// Tokens never appear in logs.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}
