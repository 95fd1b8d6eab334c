//! Authenticated REST client for the V7 strategy backend.
//!
//! `ApiClient` wraps outbound HTTP calls: it attaches the session's access
//! token as a bearer header, translates responses into JSON values or
//! classified `ApiError`s, and offers typed helpers for the monitor's
//! endpoints (analysis, signal log, VIX, treasury yield).
//!
//! Contract highlights:
//! - HTTP 401 is returned as `ApiError::Unauthenticated` with no retry and
//!   no silent refresh; the caller must go back through the auth guard.
//! - Transport failures and timeouts are `ApiError::Unavailable`.
//! - Other non-2xx statuses are `ApiError::Backend` with the status code
//!   and the backend's `detail` message when present.
//! - No retries, no backoff; every call is independent.

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use types::{AnalyzeResult, TreasuryYield, VixPoint, VixSummary};
