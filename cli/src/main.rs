//! Buy-In Tracker CLI
//!
//! Keeps a poker night's buy-ins in a local file and shares read-only
//! snapshots through the snapshot server.

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use buyin_ledger::{DenominationSet, FileStateStore, TrackedLedger};

mod client;
mod commands;
mod config;

use client::SnapshotClient;
use commands::Command;
use config::CliConfig;

/// Buy-In Tracker CLI
#[derive(Parser, Debug)]
#[command(name = "buyin")]
#[command(about = "Track poker buy-ins and share read-only snapshots")]
struct Cli {
    /// Ledger file (overrides TRACKER_STATE_PATH)
    #[arg(long)]
    state: Option<PathBuf>,

    /// Snapshot server URL (overrides TRACKER_SERVER_URL)
    #[arg(long)]
    server: Option<String>,

    /// Comma-separated blind denominations, e.g. 0.1,0.25,0.5,1
    #[arg(long)]
    denominations: Option<DenominationSet>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::from_env().with_overrides(cli.state, cli.server, cli.denominations);

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    debug!(
        state_path = %config.state_path.display(),
        server_url = %config.server_url,
        denominations = %config.denominations,
        "Configuration loaded"
    );

    let mut tracked = TrackedLedger::open(FileStateStore::new(config.state_path.clone()));

    if let Some(output) = commands::run_local(&cli.command, &mut tracked, &config.denominations)? {
        print!("{}", ensure_newline(output));
        return Ok(());
    }

    let client = SnapshotClient::new(&config.server_url)?;
    let output = match &cli.command {
        Command::Share => commands::share(&client, tracked.ledger()).await?,
        Command::View { id } => commands::view(&client, id).await?,
        _ => return Ok(()),
    };
    print!("{}", ensure_newline(output));

    Ok(())
}

fn ensure_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
