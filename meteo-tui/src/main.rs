//! Binary crate for the `meteo` terminal dashboard.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive credential configuration
//! - The full-screen dashboard: search input, weather panel, search history,
//!   and the weather map

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod map;
mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Diagnostics are opt-in: unconditional stderr output would fight the
    // alternate screen.
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let cmd = cli::Cli::parse();
    cmd.run().await
}
