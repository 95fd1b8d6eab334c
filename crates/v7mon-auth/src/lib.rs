//! Auth guard for the V7 monitor.
//!
//! Owns the session credential lifecycle:
//! - `AuthClient`: login / refresh / logout against the backend auth API
//! - `Credential`: the token pair plus expiry and user metadata
//! - `SessionHandle`: an explicit per-user-session credential slot; the
//!   guard is `require_auth()`, which yields the credential only while it
//!   is present and not expired
//!
//! All failures are returned as classified `AuthError` values; nothing in
//! this crate panics across the crate boundary.

pub mod client;
pub mod credential;
pub mod error;
pub mod session;

pub use client::AuthClient;
pub use credential::Credential;
pub use error::{AuthError, AuthResult};
pub use session::SessionHandle;
