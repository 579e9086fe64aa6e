//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `http_poller` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use http_poller::initialization::init_logger_with;
use http_poller::{run_poller, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_poller(config).await {
        Ok(report) => {
            println!(
                "✅ Polled {} cycle{} ({} request{} dispatched, {} record{} emitted, {} transport failure{}) in {:.1}s",
                report.cycles,
                if report.cycles == 1 { "" } else { "s" },
                report.requests_dispatched,
                if report.requests_dispatched == 1 { "" } else { "s" },
                report.records_emitted,
                if report.records_emitted == 1 { "" } else { "s" },
                report.transport_failures,
                if report.transport_failures == 1 { "" } else { "s" },
                report.elapsed_seconds
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("http_poller error: {:#}", e);
            process::exit(1);
        }
    }
}
