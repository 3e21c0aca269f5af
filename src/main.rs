//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `wttp_fetch` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Printing the resolved endpoint as JSON
//!
//! The binary carries no chain adapter or name service, so it only resolves
//! URLs; `.eth` hosts fail with a name-resolution error.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use wttp_fetch::initialization::init_logger_with;
use wttp_fetch::{resolve, FetchError, LogFormat, LogLevel, NetworkTable};

/// Resolve a wttp:// URL against a network table.
#[derive(Debug, Parser)]
#[command(name = "wttp_fetch", version, about)]
struct Cli {
    /// JSON file with the network table (`{"networks": [...]}`)
    #[arg(long, value_name = "FILE")]
    networks: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    log_format: LogFormat,

    /// URL to resolve, e.g. wttp://0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed:sepolia/index.html
    url: String,
}

async fn run(cli: Cli) -> Result<()> {
    let networks = NetworkTable::from_path(&cli.networks)
        .with_context(|| format!("Failed to load network table from {}", cli.networks.display()))?;

    let endpoint = resolve(&cli.url, &networks, None)
        .await
        .map_err(FetchError::from)
        .with_context(|| format!("Failed to resolve {}", cli.url))?;

    let json = serde_json::to_string_pretty(&endpoint).context("Failed to serialize endpoint")?;
    println!("{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = run(cli).await {
        eprintln!("wttp_fetch error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
