//! Buy-In Tracker snapshot server.
//!
//! Publishes ledger snapshots under short identifiers and serves them back
//! as JSON and as a read-only page.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use buyin_server::{build_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting Buy-In Tracker server");

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let state = AppState::in_memory(config.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;

    info!(
        listen_addr = %config.listen_addr,
        listen_port = %config.listen_port,
        public_url = %config.public_url,
        max_snapshots = config.storage.max_snapshots,
        "Server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await
}

/// Resolve once `signal` fires. A signal that cannot be installed never
/// resolves, so the server keeps running.
async fn wait_for_shutdown<F>(signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!(error = %e, "Failed to listen for Ctrl+C, running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
