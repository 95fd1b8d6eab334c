//! Dashboard API types.
//!
//! These types are serialized as JSON for the browser. The snapshot reuses
//! the domain types from v7mon-core/v7mon-api directly.

use serde::Serialize;

use v7mon_api::{TreasuryYield, VixSummary};
use v7mon_auth::Credential;
use v7mon_core::{MarketPhase, SignalRecord, StrategySnapshot};

/// User identity shown in the UI header. Never carries tokens.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserInfo {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl UserInfo {
    pub fn from_credential(credential: &Credential) -> Self {
        Self {
            email: credential.email.clone(),
            username: credential.username.clone(),
        }
    }
}

/// The latest rendered state for one session.
///
/// Replaced wholesale by each poll cycle; the browser fetches it from
/// `GET /api/snapshot`.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    /// When this snapshot was assembled (Unix milliseconds).
    pub timestamp_ms: i64,
    /// Current Taipei market phase.
    pub market_phase: MarketPhase,
    /// True while the poller is actively fetching (trading window open).
    pub polling: bool,
    /// Authenticated user, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
    /// Latest analysis snapshots (original/optimized variants).
    pub strategies: Vec<StrategySnapshot>,
    /// Today's global signal log, newest last.
    pub signals_today: Vec<SignalRecord>,
    /// Today's VIX data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vix: Option<VixSummary>,
    /// US 10-year treasury yield.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treasury: Option<TreasuryYield>,
    /// User-visible message for the most recent failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self {
            timestamp_ms: 0,
            market_phase: v7mon_core::market_hours::current_phase(),
            polling: false,
            user: None,
            strategies: Vec::new(),
            signals_today: Vec::new(),
            vix: None,
            treasury: None,
            last_error: None,
        }
    }
}
