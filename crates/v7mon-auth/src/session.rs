//! Per-session credential slot.
//!
//! The credential is not ambient global state: each user session owns an
//! explicit `SessionHandle` that is passed into every operation needing
//! auth. This keeps the guard testable and lets the server host multiple
//! concurrent sessions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::credential::Credential;

/// Handle to a single session's credential slot.
///
/// Cloning the handle shares the slot; the slot itself holds at most one
/// credential. There is no concurrent mutation beyond store/clear, so a
/// plain `RwLock` around the option suffices.
#[derive(Clone, Default)]
pub struct SessionHandle {
    slot: Arc<RwLock<Option<Credential>>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a credential, replacing any previous one.
    pub fn store(&self, credential: Credential) {
        *self.slot.write() = Some(credential);
    }

    /// Gate for protected operations: returns the credential only while it
    /// is present and not expired. Callers receiving `None` must render
    /// the login prompt and must not call the API.
    pub fn require_auth(&self) -> Option<Credential> {
        self.require_auth_at(Utc::now())
    }

    /// `require_auth` against a given instant.
    pub fn require_auth_at(&self, now: DateTime<Utc>) -> Option<Credential> {
        let guard = self.slot.read();
        match guard.as_ref() {
            Some(credential) if !credential.is_expired_at(now) => Some(credential.clone()),
            _ => None,
        }
    }

    /// Raw stored credential, even when the access token has expired.
    /// Needed for refresh: the refresh token outlives the access token.
    pub fn credential(&self) -> Option<Credential> {
        self.slot.read().clone()
    }

    /// Clear the stored credential unconditionally.
    pub fn clear(&self) {
        *self.slot.write() = None;
    }

    /// True while `require_auth` would succeed.
    pub fn is_authenticated(&self) -> bool {
        self.require_auth().is_some()
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
