//! Taipei market-hours classification.
//!
//! The monitored strategy trades TAIFEX day-session futures/options:
//! - Trading window: 08:45 – 13:45 Taipei time, weekdays only
//! - Signal window: 09:00 – 09:30 (when entry signals can fire)
//!
//! The poller idles outside the trading window; the dashboard reports the
//! current phase so the UI can explain why nothing is refreshing.

use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Taipei is UTC+8 year-round (no DST).
const TAIPEI_UTC_OFFSET_SECS: i32 = 8 * 3600;

/// Market phase at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPhase {
    /// Weekend or after the 13:45 close.
    Closed,
    /// Weekday before the 08:45 open.
    PreOpen,
    /// 09:00 – 09:30, entry signals can fire.
    SignalWindow,
    /// Inside 08:45 – 13:45 but outside the signal window.
    Trading,
}

impl MarketPhase {
    /// True while the trading-hours window is active and polling should run.
    pub fn is_active(self) -> bool {
        matches!(self, Self::SignalWindow | Self::Trading)
    }
}

impl std::fmt::Display for MarketPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::PreOpen => write!(f, "pre_open"),
            Self::SignalWindow => write!(f, "signal_window"),
            Self::Trading => write!(f, "trading"),
        }
    }
}

fn taipei_offset() -> FixedOffset {
    FixedOffset::east_opt(TAIPEI_UTC_OFFSET_SECS).expect("offset in range")
}

fn hm(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).expect("valid wall-clock time")
}

/// Convert a UTC instant to Taipei local time.
pub fn to_taipei(dt: DateTime<Utc>) -> DateTime<FixedOffset> {
    dt.with_timezone(&taipei_offset())
}

/// Get the market phase at a given UTC instant.
///
/// Boundaries: open and signal-window start are inclusive, close and
/// signal-window end are exclusive.
pub fn phase_at(dt: DateTime<Utc>) -> MarketPhase {
    let local = to_taipei(dt);

    if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
        return MarketPhase::Closed;
    }

    let t = local.time();
    if t < hm(8, 45) {
        return MarketPhase::PreOpen;
    }
    if t >= hm(13, 45) {
        return MarketPhase::Closed;
    }
    if (hm(9, 0)..hm(9, 30)).contains(&t) {
        return MarketPhase::SignalWindow;
    }
    MarketPhase::Trading
}

/// Get the market phase right now.
pub fn current_phase() -> MarketPhase {
    phase_at(Utc::now())
}

/// Check if the trading-hours window is active at a given UTC instant.
pub fn is_trading_at(dt: DateTime<Utc>) -> bool {
    phase_at(dt).is_active()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Build a UTC instant from Taipei wall-clock time (UTC+8).
    fn taipei(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
        taipei_offset()
            .with_ymd_and_hms(year, month, day, hour, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_weekday_pre_open() {
        // 2026-03-02 is Monday
        assert_eq!(phase_at(taipei(2026, 3, 2, 7, 0)), MarketPhase::PreOpen);
        assert_eq!(phase_at(taipei(2026, 3, 2, 8, 44)), MarketPhase::PreOpen);
    }

    #[test]
    fn test_open_boundary_inclusive() {
        assert_eq!(phase_at(taipei(2026, 3, 2, 8, 45)), MarketPhase::Trading);
    }

    #[test]
    fn test_signal_window_boundaries() {
        assert_eq!(phase_at(taipei(2026, 3, 2, 8, 59)), MarketPhase::Trading);
        assert_eq!(phase_at(taipei(2026, 3, 2, 9, 0)), MarketPhase::SignalWindow);
        assert_eq!(phase_at(taipei(2026, 3, 2, 9, 29)), MarketPhase::SignalWindow);
        assert_eq!(phase_at(taipei(2026, 3, 2, 9, 30)), MarketPhase::Trading);
    }

    #[test]
    fn test_close_boundary_exclusive() {
        assert_eq!(phase_at(taipei(2026, 3, 2, 13, 44)), MarketPhase::Trading);
        assert_eq!(phase_at(taipei(2026, 3, 2, 13, 45)), MarketPhase::Closed);
        assert_eq!(phase_at(taipei(2026, 3, 2, 20, 0)), MarketPhase::Closed);
    }

    #[test]
    fn test_weekend_closed() {
        // 2026-03-07 is Saturday, 2026-03-08 is Sunday
        assert_eq!(phase_at(taipei(2026, 3, 7, 10, 0)), MarketPhase::Closed);
        assert_eq!(phase_at(taipei(2026, 3, 8, 10, 0)), MarketPhase::Closed);
    }

    #[test]
    fn test_is_trading_at() {
        assert!(is_trading_at(taipei(2026, 3, 2, 10, 0)));
        assert!(!is_trading_at(taipei(2026, 3, 2, 14, 0)));
        assert!(!is_trading_at(taipei(2026, 3, 7, 10, 0)));
    }

    #[test]
    fn test_utc_conversion() {
        // 01:00 UTC == 09:00 Taipei
        let dt = Utc.with_ymd_and_hms(2026, 3, 2, 1, 0, 0).unwrap();
        assert_eq!(phase_at(dt), MarketPhase::SignalWindow);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(MarketPhase::SignalWindow.to_string(), "signal_window");
        assert_eq!(MarketPhase::Closed.to_string(), "closed");
    }
}
