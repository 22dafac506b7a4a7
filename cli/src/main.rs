//! `pl-cli`: data generation and maintenance for the prompt library.

use anyhow::Result;
use clap::Parser;
use pl_cli::{cli::Cli, commands};
use prompt_library_shared::logging::{init_tracing, LogConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Default to info-level logs; override via RUST_LOG if needed.
    let _log_guard = init_tracing(&LogConfig::default())?;

    let cli = Cli::parse();
    commands::run(cli).await
}
