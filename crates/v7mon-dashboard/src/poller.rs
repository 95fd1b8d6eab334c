//! Per-session refresh loop.
//!
//! A cooperative timer-driven cycle: wake, fetch, store, sleep. One task
//! per session, stopped deterministically through the session's
//! cancellation token on logout or server shutdown. A tick that finds the
//! session unauthenticated makes no backend calls at all.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use v7mon_api::{ApiClient, ApiError, ApiResult};
use v7mon_auth::{AuthClient, AuthError, Credential};
use v7mon_core::market_hours::{self, MarketPhase};
use v7mon_core::{SignalRecord, StrategySnapshot};

use crate::config::PollerConfig;
use crate::state::SessionContext;
use crate::types::{DashboardSnapshot, UserInfo};

/// Run the refresh loop for one session until its token is cancelled.
pub async fn run_poller(
    session: SessionContext,
    auth: Arc<AuthClient>,
    api: Arc<ApiClient>,
    config: PollerConfig,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(config.interval_secs.max(1)));
    // A slow cycle must not queue up extra ticks behind it.
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let cancel = session.cancel_token();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Poller cancelled");
                break;
            }
            _ = interval.tick() => {
                refresh_once(&session, &auth, &api, &config).await;
            }
        }
    }
}

/// Execute one refresh cycle against the current time.
pub async fn refresh_once(
    session: &SessionContext,
    auth: &AuthClient,
    api: &ApiClient,
    config: &PollerConfig,
) {
    refresh_at(Utc::now(), session, auth, api, config).await;
}

/// One refresh cycle evaluated at a given instant (split out for tests).
pub async fn refresh_at(
    now: DateTime<Utc>,
    session: &SessionContext,
    auth: &AuthClient,
    api: &ApiClient,
    config: &PollerConfig,
) {
    let phase = market_hours::phase_at(now);

    maybe_refresh_token(session, auth, config).await;

    // The auth guard gates the whole cycle: unauthenticated sessions fetch
    // nothing and render only the login prompt.
    let Some(credential) = session.auth().require_auth_at(now) else {
        session.update_snapshot(|s| {
            s.timestamp_ms = now.timestamp_millis();
            s.market_phase = phase;
            s.polling = false;
            s.user = None;
        });
        return;
    };

    if !phase.is_active() {
        debug!(%phase, "Outside trading window, idling");
        session.update_snapshot(|s| {
            s.timestamp_ms = now.timestamp_millis();
            s.market_phase = phase;
            s.polling = false;
            s.user = Some(UserInfo::from_credential(&credential));
            s.last_error = None;
        });
        return;
    }

    let previous = session.snapshot();
    let mut last_error: Option<String> = None;

    let local = market_hours::to_taipei(now);
    let strategies = match outcome(api.analyze(&credential, local.date_naive(), local.time()).await)
    {
        Fetch::Ok(result) => result.snapshots().cloned().collect::<Vec<_>>(),
        Fetch::AuthLost => return expire_session(session, now, phase),
        Fetch::Failed(msg) => {
            last_error.get_or_insert(msg);
            previous.strategies.clone()
        }
    };

    if phase == MarketPhase::SignalWindow {
        record_new_signals(api, &credential, now, &previous.strategies, &strategies).await;
    }

    let signals_today = match outcome(api.signals_today(&credential).await) {
        Fetch::Ok(rows) => rows,
        Fetch::AuthLost => return expire_session(session, now, phase),
        Fetch::Failed(msg) => {
            last_error.get_or_insert(msg);
            previous.signals_today.clone()
        }
    };

    let vix = match outcome(api.vix_today(&credential).await) {
        Fetch::Ok(summary) => Some(summary),
        Fetch::AuthLost => return expire_session(session, now, phase),
        Fetch::Failed(msg) => {
            last_error.get_or_insert(msg);
            previous.vix.clone()
        }
    };

    let treasury = match outcome(api.treasury_yield(&credential).await) {
        Fetch::Ok(treasury) => Some(treasury),
        Fetch::AuthLost => return expire_session(session, now, phase),
        Fetch::Failed(msg) => {
            last_error.get_or_insert(msg);
            previous.treasury.clone()
        }
    };

    session.store_snapshot(DashboardSnapshot {
        timestamp_ms: now.timestamp_millis(),
        market_phase: phase,
        polling: true,
        user: Some(UserInfo::from_credential(&credential)),
        strategies,
        signals_today,
        vix,
        treasury,
        last_error,
    });
}

/// Proactive token refresh ahead of a cycle.
///
/// Skipped entirely when the session holds no credential. A rejected
/// refresh token clears the session; a transport failure keeps the current
/// credential so the cycle can still run while it remains valid.
async fn maybe_refresh_token(session: &SessionContext, auth: &AuthClient, config: &PollerConfig) {
    let Some(credential) = session.auth().credential() else {
        return;
    };
    if !credential.expires_within(Duration::from_secs(config.refresh_margin_secs)) {
        return;
    }

    match auth.refresh(&credential).await {
        Ok(refreshed) => {
            debug!(expires_at = %refreshed.expires_at, "Access token refreshed ahead of expiry");
            session.auth().store(refreshed);
        }
        Err(AuthError::InvalidCredentials) => {
            info!("Refresh token rejected, session requires login");
            session.auth().clear();
        }
        Err(AuthError::ServiceUnavailable(msg)) => {
            warn!(error = %msg, "Token refresh failed, keeping current credential");
        }
    }
}

/// Record strategy signals that flipped to an active state this cycle.
/// Errors are logged only; the signal log is best-effort.
async fn record_new_signals(
    api: &ApiClient,
    credential: &Credential,
    now: DateTime<Utc>,
    previous: &[StrategySnapshot],
    current: &[StrategySnapshot],
) {
    for snapshot in current.iter().filter(|s| s.signal.is_active()) {
        let already_seen = previous
            .iter()
            .any(|p| p.strategy == snapshot.strategy && p.signal == snapshot.signal);
        if already_seen {
            continue;
        }

        let record = SignalRecord {
            timestamp: now,
            strategy: snapshot.strategy.clone(),
            signal: snapshot.signal,
            price: snapshot.metrics.get("tx_close").copied(),
            note: None,
        };
        if let Err(e) = api.record_signal(credential, &record).await {
            debug!(strategy = %record.strategy, error = %e, "Failed to record signal");
        } else {
            info!(strategy = %record.strategy, signal = %record.signal, "Signal recorded");
        }
    }
}

/// Backend said 401: drop the credential so the UI falls back to the login
/// prompt. No automatic re-login.
fn expire_session(session: &SessionContext, now: DateTime<Utc>, phase: MarketPhase) {
    info!("Backend rejected access token, clearing session");
    session.auth().clear();
    session.update_snapshot(|s| {
        s.timestamp_ms = now.timestamp_millis();
        s.market_phase = phase;
        s.polling = false;
        s.user = None;
        s.last_error = Some(user_message(&ApiError::Unauthenticated));
    });
}

enum Fetch<T> {
    Ok(T),
    AuthLost,
    Failed(String),
}

fn outcome<T>(result: ApiResult<T>) -> Fetch<T> {
    match result {
        Ok(value) => Fetch::Ok(value),
        Err(ApiError::Unauthenticated) => Fetch::AuthLost,
        Err(e) => Fetch::Failed(user_message(&e)),
    }
}

/// Map an API error to the message shown in the UI.
pub fn user_message(error: &ApiError) -> String {
    match error {
        ApiError::Unauthenticated => "Please log in again".to_string(),
        ApiError::Unavailable(_) => "Service temporarily unavailable".to_string(),
        ApiError::Backend { status, message } => format!("Backend error ({status}): {message}"),
        ApiError::Json(_) => "Unexpected response from backend".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(user_message(&ApiError::Unauthenticated), "Please log in again");
        assert_eq!(
            user_message(&ApiError::Unavailable("connect refused".into())),
            "Service temporarily unavailable"
        );
        assert_eq!(
            user_message(&ApiError::Backend {
                status: 400,
                message: "bad window".into()
            }),
            "Backend error (400): bad window"
        );
    }
}
