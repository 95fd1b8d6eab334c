//! Session state management.
//!
//! One `SessionContext` per authenticated browser session: the auth slot,
//! the latest snapshot and the cancellation token for that session's
//! polling task. The `SessionRegistry` maps opaque session ids to contexts
//! so the server can host multiple concurrent users.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use v7mon_auth::SessionHandle;

use crate::types::DashboardSnapshot;

/// State owned by a single user session.
#[derive(Clone)]
pub struct SessionContext {
    auth: SessionHandle,
    snapshot: Arc<RwLock<DashboardSnapshot>>,
    cancel: CancellationToken,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            auth: SessionHandle::new(),
            snapshot: Arc::new(RwLock::new(DashboardSnapshot::default())),
            cancel: CancellationToken::new(),
        }
    }

    /// This session's credential slot.
    pub fn auth(&self) -> &SessionHandle {
        &self.auth
    }

    /// Latest snapshot (cloned).
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot.read().clone()
    }

    /// Replace the snapshot wholesale.
    pub fn store_snapshot(&self, snapshot: DashboardSnapshot) {
        *self.snapshot.write() = snapshot;
    }

    /// Mutate the snapshot in place.
    pub fn update_snapshot(&self, f: impl FnOnce(&mut DashboardSnapshot)) {
        f(&mut self.snapshot.write());
    }

    /// Token observed by this session's polling task.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop the polling task and drop the credential. Idempotent.
    pub fn shutdown(&self) {
        self.cancel.cancel();
        self.auth.clear();
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.auth.is_authenticated())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

/// Registry of active sessions, keyed by opaque session id.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, SessionContext>>>,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            max_sessions,
        }
    }

    /// Create a new session. Returns `None` when the registry is at
    /// capacity.
    pub fn create(&self) -> Option<(Uuid, SessionContext)> {
        let mut sessions = self.inner.write();
        if sessions.len() >= self.max_sessions {
            return None;
        }
        let id = Uuid::new_v4();
        let context = SessionContext::new();
        sessions.insert(id, context.clone());
        Some((id, context))
    }

    pub fn get(&self, id: &Uuid) -> Option<SessionContext> {
        self.inner.read().get(id).cloned()
    }

    /// Remove a session from the registry. The caller is responsible for
    /// calling `shutdown()` on the returned context.
    pub fn remove(&self, id: &Uuid) -> Option<SessionContext> {
        self.inner.write().remove(id)
    }

    pub fn active_count(&self) -> usize {
        self.inner.read().len()
    }

    /// Shut down every session; used during process shutdown so no poller
    /// outlives the server.
    pub fn shutdown_all(&self) {
        let mut sessions = self.inner.write();
        for (_, session) in sessions.drain() {
            session.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_lookup() {
        let registry = SessionRegistry::new(4);
        let (id, _session) = registry.create().unwrap();
        assert!(registry.get(&id).is_some());
        assert_eq!(registry.active_count(), 1);
    }

    #[test]
    fn test_capacity_limit() {
        let registry = SessionRegistry::new(1);
        assert!(registry.create().is_some());
        assert!(registry.create().is_none());
    }

    #[test]
    fn test_remove_frees_slot() {
        let registry = SessionRegistry::new(1);
        let (id, session) = registry.create().unwrap();
        registry.remove(&id).unwrap();
        session.shutdown();
        assert_eq!(registry.active_count(), 0);
        assert!(registry.create().is_some());
    }

    #[test]
    fn test_shutdown_cancels_token_and_clears_auth() {
        let session = SessionContext::new();
        let token = session.cancel_token();
        session.shutdown();
        assert!(token.is_cancelled());
        assert!(session.auth().credential().is_none());
    }

    #[test]
    fn test_shutdown_all_empties_registry() {
        let registry = SessionRegistry::new(4);
        let (_, first) = registry.create().unwrap();
        let (_, second) = registry.create().unwrap();
        registry.shutdown_all();
        assert_eq!(registry.active_count(), 0);
        assert!(first.cancel_token().is_cancelled());
        assert!(second.cancel_token().is_cancelled());
    }
}
