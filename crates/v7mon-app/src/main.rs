//! V7 Strategy Monitor - Entry Point
//!
//! Serves a browser dashboard that polls the V7 analysis backend on a
//! fixed interval during Taipei trading hours.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// V7 Strategy Monitor dashboard
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via V7MON_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    v7mon_app::logging::init_logging();

    info!("Starting V7 Monitor v{}", env!("CARGO_PKG_VERSION"));

    // Determine config path: CLI arg > V7MON_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("V7MON_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");

    let config = v7mon_app::AppConfig::load(&config_path)?;
    info!(api_base_url = %config.normalized_api_base_url(), "Configuration loaded");

    let app = v7mon_app::Application::new(config);
    app.run().await?;

    Ok(())
}
