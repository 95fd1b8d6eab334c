//! Core domain types for the V7 strategy monitor.
//!
//! This crate provides the types shared by the auth guard, the API client
//! and the dashboard:
//! - `SignalState`, `StrategySnapshot`, `SignalRecord`: strategy signal data
//! - `Endpoint`: static descriptors for backend REST operations
//! - `market_hours`: Taipei trading-window classification

pub mod endpoint;
pub mod error;
pub mod market_hours;
pub mod signal;

pub use endpoint::{Endpoint, HttpMethod};
pub use error::{CoreError, Result};
pub use market_hours::MarketPhase;
pub use signal::{SignalRecord, SignalState, StrategySnapshot};
