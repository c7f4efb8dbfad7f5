// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # AEGIS Remediator CLI
//!
//! The `aegis-remediator` binary runs the alarm remediation service.
//!
//! ## Commands
//!
//! - `aegis-remediator serve` — run the HTTP ingestion endpoint
//! - `aegis-remediator report [--date YYYY-MM-DD]` — build and deliver the
//!   daily incident report
//! - `aegis-remediator simulate [--file event.json]` — feed a sample alarm
//!   event through the live pipeline
//!
//! Configuration is resolved from the environment once at startup (see
//! `RemediatorConfig`); a `.env` file in the working directory is honored.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod commands;
mod services;

use aegis_remediator_core::infrastructure::RemediatorConfig;

/// AEGIS Remediator - classify cloud alarms and run safety-gated fixes
#[derive(Parser)]
#[command(name = "aegis-remediator")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "REMEDIATOR_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP ingestion endpoint
    Serve {
        /// HTTP API host
        #[arg(long, env = "REMEDIATOR_HOST", default_value = "127.0.0.1")]
        host: String,

        /// HTTP API port
        #[arg(long, env = "REMEDIATOR_PORT", default_value = "8000")]
        port: u16,
    },

    /// Build and deliver the daily incident report
    Report {
        /// Report date (YYYY-MM-DD); defaults to the current UTC date
        #[arg(long)]
        date: Option<String>,
    },

    /// Feed a sample alarm event through the live pipeline
    Simulate {
        /// JSON file with the event payload (defaults to the bundled sample)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    let config = RemediatorConfig::from_env();
    config.missing_recommended();

    match cli.command {
        Some(Commands::Serve { host, port }) => commands::serve::run(&config, &host, port).await,
        Some(Commands::Report { date }) => commands::report::run(&config, date).await,
        Some(Commands::Simulate { file }) => commands::simulate::run(&config, file).await,
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
