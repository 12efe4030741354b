// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use bff_core::domain::bff_config::{BffConfigManifest, StorageBackendKind};

const MINIMAL_TEMPLATE: &str = include_str!("../../templates/config-minimal.yaml");
const EXAMPLES_TEMPLATE: &str = include_str!("../../templates/config-with-examples.yaml");

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,

        /// Print the effective configuration as YAML
        #[arg(long)]
        yaml: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./process-bff.yaml)
        #[arg(short, long, default_value = "./process-bff.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths, yaml } => show(config_override, paths, yaml).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(output, examples).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool, as_yaml: bool) -> Result<()> {
    let config = BffConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. PROCESS_BFF_CONFIG_PATH: {}",
            std::env::var("PROCESS_BFF_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./process-bff.yaml");
        println!("  4. ~/.process-bff/config.yaml");
        println!("  5. /etc/process-bff/config.yaml");
        println!();
    }

    if as_yaml {
        let yaml = serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
        print!("{}", yaml);
        return Ok(());
    }

    let spec = &config.spec;
    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Instance:".bold());
    println!("  Name: {}", config.metadata.name);
    println!();

    println!("{}", "Process Engine:".bold());
    println!("  URL: {}", spec.engine.url);
    println!("  Timeout: {}s", spec.engine.timeout_seconds);
    println!(
        "  Auth token: {}",
        if spec.engine.auth_token.is_some() {
            "(configured)"
        } else {
            "(none)"
        }
    );
    println!();

    println!("{}", "Form Data Storage:".bold());
    match spec.storage.backend {
        StorageBackendKind::Http => {
            println!("  Backend: http");
            println!(
                "  URL: {}",
                spec.storage.url.as_deref().unwrap_or("(not set)")
            );
            println!("  Bucket: {}", spec.storage.bucket);
        }
        StorageBackendKind::InMemory => {
            println!("  Backend: in-memory {}", "(payloads lost on restart)".dimmed());
        }
    }
    println!();

    println!("{}", "Form Validation:".bold());
    println!("  URL: {}", spec.form_validation.url);
    println!();

    println!("{}", "Network:".bold());
    println!("  Listen: {}:{}", spec.network.bind_address, spec.network.port);
    println!();

    if !spec.messages.is_empty() {
        println!("{}", "Message overrides:".bold());
        let mut keys: Vec<_> = spec.messages.keys().collect();
        keys.sort();
        for key in keys {
            println!("  {} → {}", key, spec.messages[key]);
        }
        println!();
    }

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = BffConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: PathBuf, with_examples: bool) -> Result<()> {
    let sample = if with_examples {
        EXAMPLES_TEMPLATE
    } else {
        MINIMAL_TEMPLATE
    };

    std::fs::write(&output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
