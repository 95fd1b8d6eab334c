//! Main application orchestration.
//!
//! Builds the auth and API clients, the session registry and the
//! dashboard server, and ties their lifetimes to a shutdown token.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use v7mon_api::ApiClient;
use v7mon_auth::AuthClient;
use v7mon_dashboard::{run_server, AppState, SessionRegistry};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// Main application.
pub struct Application {
    config: AppConfig,
}

impl Application {
    /// Create a new application.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run the dashboard server until Ctrl-C or a server error.
    pub async fn run(self) -> AppResult<()> {
        let base_url = self.config.normalized_api_base_url();
        let timeout = Duration::from_secs(self.config.request_timeout_secs);

        info!(
            base_url = %base_url,
            port = self.config.dashboard.port,
            interval_secs = self.config.poller.interval_secs,
            "Starting dashboard"
        );

        let auth_client = Arc::new(AuthClient::with_timeout(&base_url, timeout)?);
        let api_client = Arc::new(ApiClient::with_timeout(&base_url, timeout)?);
        let registry = SessionRegistry::new(self.config.dashboard.max_sessions);

        let state = AppState {
            registry: registry.clone(),
            auth_client,
            api_client,
            poller: self.config.poller.clone(),
        };

        let shutdown = CancellationToken::new();
        let signal_token = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
            }
            signal_token.cancel();
        });

        run_server(state, self.config.dashboard.clone(), shutdown)
            .await
            .map_err(|e| AppError::Server(e.to_string()))?;

        info!("Dashboard stopped");
        Ok(())
    }
}
