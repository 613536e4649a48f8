//! Command-line interface for row-streamer
//!
//! ```bash
//! # Replay "Life expectancy.csv" to localhost:9999 every 3 seconds
//! row-streamer
//!
//! # Custom dataset, destination and pause
//! row-streamer --input data.csv --host 10.0.0.5 --port 5005 --delay 500ms
//!
//! # More detail (socket binding, row counts)
//! RUST_LOG=debug row-streamer
//! ```

use anyhow::Context;
use clap::Parser;
use row_streamer::{StreamerArgs, StreamerConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "row-streamer")]
#[command(about = "Replay a CSV dataset as a live UDP feed")]
#[command(long_about = None)]
struct Cli {
    #[command(flatten)]
    args: StreamerArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("An error occurred: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = StreamerConfig::from(cli.args);

    info!("===============================================");
    info!("Starting fake streaming process.");

    let passes = row_streamer::run(config)
        .await
        .context("Streaming stopped")?;

    info!("Streaming stopped after {passes} complete passes.");
    info!("===============================================");
    Ok(())
}
