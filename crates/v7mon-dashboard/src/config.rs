//! Dashboard and poller configuration.

use serde::{Deserialize, Serialize};

/// Dashboard server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum concurrent browser sessions.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_port() -> u16 {
    8501
}

fn default_max_sessions() -> usize {
    32
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            max_sessions: default_max_sessions(),
        }
    }
}

/// Refresh-loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Seconds between refresh cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Refresh the access token when it expires within this many seconds.
    #[serde(default = "default_refresh_margin_secs")]
    pub refresh_margin_secs: u64,
}

fn default_interval_secs() -> u64 {
    30
}

fn default_refresh_margin_secs() -> u64 {
    60
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            refresh_margin_secs: default_refresh_margin_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let dashboard = DashboardConfig::default();
        assert_eq!(dashboard.port, 8501);
        assert_eq!(dashboard.max_sessions, 32);

        let poller = PollerConfig::default();
        assert_eq!(poller.interval_secs, 30);
        assert_eq!(poller.refresh_margin_secs, 60);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: DashboardConfig = serde_json::from_str(r#"{"port": 9000}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_sessions, 32);
    }
}
