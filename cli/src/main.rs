// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Process BFF
//!
//! The `process-bff` binary serves the officer/citizen process API in front
//! of a remote process engine.
//!
//! ## Commands
//!
//! - `process-bff serve` - Run the HTTP API (default when no command is given)
//! - `process-bff config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bff_core::domain::bff_config::BffConfigManifest;
use process_bff::commands::{self, ConfigCommand};
use process_bff::server;

/// Process BFF - process definitions, instances and start forms over a remote engine
#[derive(Parser)]
#[command(name = "process-bff")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "PROCESS_BFF_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); falls back to the config, then "info"
    #[arg(long, global = true, env = "PROCESS_BFF_LOG_LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "PROCESS_BFF_LOG_JSON")]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    #[command(name = "serve")]
    Serve {
        /// HTTP API port (overrides configuration)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging preferences only; commands load and report config errors themselves
    let configured = BffConfigManifest::load_or_default(cli.config.clone()).ok();
    let level = cli
        .log_level
        .clone()
        .or_else(|| {
            configured
                .as_ref()
                .and_then(|c| c.log_level().map(str::to_string))
        })
        .unwrap_or_else(|| "info".to_string());
    let json = cli.json_logs || configured.as_ref().is_some_and(|c| c.json_logs());

    init_logging(&level, json)?;

    match cli.command {
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        Some(Commands::Serve { port }) => server::serve(cli.config, port).await,
        None => server::serve(cli.config, None).await,
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if json {
        builder.json().with_current_span(false).init();
    } else {
        builder.with_target(false).compact().init();
    }

    Ok(())
}
