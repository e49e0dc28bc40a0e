// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Sentio Agent CLI
//!
//! The `sentio` binary hosts one agent in-process: memory, reasoning
//! pipeline, decision maker and learning monitor, driven from the terminal.
//!
//! ## Commands
//!
//! - `sentio run <INPUT>...` - Handle each request in order and print the outcome
//! - `sentio repl` - Interactive session with the agent
//! - `sentio report --script FILE` - Replay a request script and print the learning report
//! - `sentio config show|validate|generate` - Configuration management

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use sentio_core::domain::agent_config::AgentConfigManifest;
use std::path::PathBuf;

use sentio_cli::commands::{self, ConfigCommand, ReplArgs, ReportArgs, RunArgs};

/// Sentio - perception, reasoning, decision and learning for command agents
#[derive(Parser)]
#[command(name = "sentio")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "SENTIO_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); defaults to the manifest value
    #[arg(long, global = true, env = "SENTIO_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (text, json); defaults to the manifest value
    #[arg(long, global = true, env = "SENTIO_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle one or more requests and exit
    #[command(name = "run")]
    Run(RunArgs),

    /// Interactive session
    #[command(name = "repl")]
    Repl(ReplArgs),

    /// Replay a script of requests and print the performance report
    #[command(name = "report")]
    Report(ReportArgs),

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logging(&cli)?;

    match cli.command {
        Some(Commands::Run(args)) => commands::run::handle_command(args, cli.config).await,
        Some(Commands::Repl(args)) => commands::repl::handle_command(args, cli.config).await,
        Some(Commands::Report(args)) => commands::report::handle_command(args, cli.config).await,
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        None => {
            // No command provided - show help
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
///
/// Flags and environment win over the manifest's `observability.logging`.
fn init_logging(cli: &Cli) -> Result<()> {
    let manifest_logging = AgentConfigManifest::load_or_default(cli.config.clone())
        .ok()
        .map(|manifest| manifest.spec.observability.logging)
        .unwrap_or_default();

    let level = cli.log_level.as_deref().unwrap_or(&manifest_logging.level);
    let format = cli.log_format.as_deref().unwrap_or(&manifest_logging.format);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        "json" => builder.json().init(),
        "text" => builder.compact().init(),
        other => bail!("Unsupported log format '{}' (expected 'json' or 'text')", other),
    }

    Ok(())
}
