//! Typed backend response payloads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use v7mon_core::StrategySnapshot;

/// Result of the V7 dual-strategy analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResult {
    #[serde(default)]
    pub success: bool,
    /// Original strategy variant.
    pub original: Option<StrategySnapshot>,
    /// Optimized strategy variant.
    pub optimized: Option<StrategySnapshot>,
    /// Market context shared by both variants.
    #[serde(default)]
    pub market_data: std::collections::HashMap<String, Decimal>,
}

impl AnalyzeResult {
    /// Iterate over whichever strategy variants the backend returned.
    pub fn snapshots(&self) -> impl Iterator<Item = &StrategySnapshot> {
        self.original.iter().chain(self.optimized.iter())
    }
}

/// One minute-level VIX reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VixPoint {
    pub time: DateTime<Utc>,
    pub value: Decimal,
}

/// Today's VIX data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VixSummary {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub count: usize,
    /// Most recent reading.
    pub latest: Option<VixPoint>,
    /// Intraday minute rows, oldest first.
    #[serde(default)]
    pub data: Vec<VixPoint>,
}

/// US 10-year treasury yield with day change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasuryYield {
    #[serde(default)]
    pub success: bool,
    pub yield_pct: Decimal,
    #[serde(default)]
    pub change: Decimal,
    #[serde(default)]
    pub change_pct: Decimal,
    #[serde(default)]
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use v7mon_core::SignalState;

    #[test]
    fn test_analyze_result_parses_both_variants() {
        let result: AnalyzeResult = serde_json::from_str(
            r#"{
                "success": true,
                "original": {"strategy": "v7-original", "signal": "none"},
                "optimized": {"strategy": "v7-optimized", "signal": "long"},
                "market_data": {"tx_open": 22050}
            }"#,
        )
        .unwrap();

        assert!(result.success);
        assert_eq!(result.snapshots().count(), 2);
        assert_eq!(result.optimized.unwrap().signal, SignalState::Long);
        assert_eq!(result.market_data["tx_open"], dec!(22050));
    }

    #[test]
    fn test_analyze_result_tolerates_missing_variants() {
        let result: AnalyzeResult = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(result.original.is_none());
        assert_eq!(result.snapshots().count(), 0);
    }

    #[test]
    fn test_vix_summary_parses() {
        let summary: VixSummary = serde_json::from_str(
            r#"{
                "success": true,
                "count": 2,
                "latest": {"time": "2026-03-02T01:29:00Z", "value": 18.42},
                "data": [
                    {"time": "2026-03-02T01:28:00Z", "value": 18.40},
                    {"time": "2026-03-02T01:29:00Z", "value": 18.42}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.latest.unwrap().value, dec!(18.42));
    }

    #[test]
    fn test_treasury_yield_parses() {
        let treasury: TreasuryYield = serde_json::from_str(
            r#"{"success": true, "yield_pct": 4.25, "change": -0.03, "change_pct": -0.7, "source": "fred"}"#,
        )
        .unwrap();
        assert_eq!(treasury.yield_pct, dec!(4.25));
        assert_eq!(treasury.change, dec!(-0.03));
    }
}
