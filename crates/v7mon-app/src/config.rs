//! Application configuration.
//!
//! Loaded from a TOML file; the backend base URL can be overridden with
//! the `V7MON_API_BASE_URL` environment variable (the deployment's only
//! required external setting).

use std::path::Path;

use serde::{Deserialize, Serialize};

use v7mon_dashboard::{DashboardConfig, PollerConfig};

use crate::error::{AppError, AppResult};

/// Environment variable overriding the backend base URL.
pub const API_BASE_URL_ENV: &str = "V7MON_API_BASE_URL";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend base URL. Normalized to end with `/api/v1`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Timeout for backend HTTP calls, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Dashboard server configuration.
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Refresh-loop configuration.
    #[serde(default)]
    pub poller: PollerConfig,
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            dashboard: DashboardConfig::default(),
            poller: PollerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist. Environment overrides apply either way.
    pub fn load(path: &str) -> AppResult<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!(path = %path, "Config file not found, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_base_url = url;
            }
        }
    }

    /// Base URL with a trailing slash trimmed and the `/api/v1` suffix
    /// appended when missing.
    pub fn normalized_api_base_url(&self) -> String {
        let trimmed = self.api_base_url.trim_end_matches('/');
        if trimmed.ends_with("/api/v1") {
            trimmed.to_string()
        } else {
            format!("{trimmed}/api/v1")
        }
    }
}
