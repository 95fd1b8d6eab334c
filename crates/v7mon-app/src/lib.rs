//! V7 strategy monitor application.
//!
//! Wires the pieces together: configuration loading, structured logging,
//! the auth/API clients, the session registry and the dashboard server.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
