// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use sentio_core::domain::agent_config::{AgentConfigManifest, CONFIG_PATH_ENV};

/// Environment overrides listed in generated files
const OVERRIDE_HELP: &str = "\
# Environment overrides (applied after this file is loaded):
#   SENTIO_RELEVANCE_THRESHOLD   memory.relevance_threshold
#   SENTIO_CONFIDENCE_THRESHOLD  reasoning.understanding_threshold
#   SENTIO_VALIDATION_THRESHOLD  reasoning.validation_threshold
#   SENTIO_MAX_UNCERTAINTY       decision.max_uncertainty
#   SENTIO_DRIFT_THRESHOLD       learning.drift_threshold
#   SENTIO_PRUNER_ENABLED        pruner.enabled
#   SENTIO_LOG_FORMAT            observability.logging.format
";

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./sentio-config.yaml)
        #[arg(short, long, default_value = "./sentio-config.yaml")]
        output: PathBuf,

        /// Include a comment block listing environment overrides
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(output, examples).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = AgentConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. {}: {}",
            CONFIG_PATH_ENV,
            std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./sentio-config.yaml");
        println!("  4. ~/.sentio/config.yaml");
        println!("  5. /etc/sentio/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Agent:".bold());
    println!("  Name: {}", config.metadata.name);
    if let Some(version) = &config.metadata.version {
        println!("  Version: {}", version);
    }
    println!();

    let spec = &config.spec;
    println!("{}", "Memory:".bold());
    println!("  Max history: {}", spec.memory.max_history);
    println!("  Relevance threshold: {}", spec.memory.relevance_threshold);
    println!("  Retention: {} days", spec.memory.retention_days);
    println!();

    println!("{}", "Reasoning:".bold());
    println!(
        "  Understanding threshold: {}",
        spec.reasoning.understanding_threshold
    );
    println!(
        "  Validation threshold: {}",
        spec.reasoning.validation_threshold
    );
    println!();

    println!("{}", "Decision:".bold());
    println!("  Max uncertainty: {}", spec.decision.max_uncertainty);
    println!("  Default timeout: {} ms", spec.decision.default_timeout_ms);
    println!("  Default retries: {}", spec.decision.default_retries);
    println!();

    println!("{}", "Learning:".bold());
    println!("  Drift threshold: {}", spec.learning.drift_threshold);
    println!("  Drift window: {}", spec.learning.drift_window);
    println!();

    println!("{}", "Pruner:".bold());
    println!(
        "  Enabled: {} (every {}s)",
        spec.pruner.enabled, spec.pruner.interval_seconds
    );
    println!();

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = AgentConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: PathBuf, with_examples: bool) -> Result<()> {
    let manifest = AgentConfigManifest::default();
    let yaml = serde_yaml::to_string(&manifest).context("Failed to render configuration")?;
    let sample = if with_examples {
        format!("{OVERRIDE_HELP}{yaml}")
    } else {
        yaml
    };

    std::fs::write(&output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
