//! Strategy signal types.
//!
//! A `StrategySnapshot` is one analysis result returned by the backend.
//! Snapshots are read-only: each poll cycle replaces the previous one in
//! memory, nothing is persisted locally.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Signal state reported by the strategy backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalState {
    /// No actionable signal.
    #[default]
    None,
    /// Long (call-side) signal.
    Long,
    /// Short (put-side) signal.
    Short,
}

impl SignalState {
    /// True when the state carries an actionable direction.
    pub fn is_active(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl std::fmt::Display for SignalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Long => write!(f, "long"),
            Self::Short => write!(f, "short"),
        }
    }
}

impl FromStr for SignalState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "long" => Ok(Self::Long),
            "short" => Ok(Self::Short),
            other => Err(CoreError::InvalidSignalState(other.to_string())),
        }
    }
}

/// One analysis result for a single strategy variant.
///
/// Immutable once received; a new snapshot simply replaces the previous
/// one on the next refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySnapshot {
    /// Strategy identifier (e.g. "v7-original", "v7-optimized").
    pub strategy: String,
    /// Signal state for this snapshot.
    #[serde(default)]
    pub signal: SignalState,
    /// Named market metrics attached to the snapshot.
    #[serde(default)]
    pub metrics: HashMap<String, Decimal>,
    /// When the backend produced the snapshot. Absent for bare results.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// One row of the day's global signal log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    /// When the signal fired.
    pub timestamp: DateTime<Utc>,
    /// Strategy identifier.
    pub strategy: String,
    /// Signal direction.
    pub signal: SignalState,
    /// Reference price at signal time, when the backend reports one.
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Free-form note from the backend.
    #[serde(default)]
    pub note: Option<String>,
}
