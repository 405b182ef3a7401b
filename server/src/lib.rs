//! Buy-In Tracker Server
//!
//! Publishes ledger snapshots under generated identifiers and serves them
//! back as JSON and as a read-only HTML page.

pub mod config;
pub mod metrics;
pub mod render;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use routes::build_router;
pub use state::AppState;
