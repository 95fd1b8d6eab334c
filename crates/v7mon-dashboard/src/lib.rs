//! v7mon-dashboard - browser UI and refresh loop for the V7 monitor.
//!
//! This crate hosts the presentation shell:
//!
//! - axum HTTP server serving the static dashboard page and a JSON API
//!   (`POST /api/login`, `POST /api/logout`, `GET /api/snapshot`)
//! - a per-session polling task that fetches analysis, the signal log,
//!   VIX and treasury data on a fixed interval while the Taipei trading
//!   window is active, and idles otherwise
//!
//! Every protected route goes through the session's auth guard: without a
//! valid credential the API returns only the unauthenticated state and the
//! poller makes no backend calls. All backend failures become user-visible
//! status strings; nothing here is fatal to the process.

mod config;
mod poller;
mod server;
mod state;
mod types;

pub use config::{DashboardConfig, PollerConfig};
pub use poller::{refresh_at, refresh_once, run_poller, user_message};
pub use server::{create_router, run_server, AppState};
pub use state::{SessionContext, SessionRegistry};
pub use types::{DashboardSnapshot, UserInfo};
