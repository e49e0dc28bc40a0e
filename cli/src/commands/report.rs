// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Script replay and learning report
//!
//! Each non-empty line of the script is one request. Lines starting with `#`
//! are comments. A request prefixed with `!` is executed against a dry-run
//! executor staged to fail, so the monitor learns a single failed sample for
//! it and scripts can exercise drift and adaptation. Requests answered with a
//! clarification execute nothing and record nothing.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use sentio_cortex::domain::{BehaviorAnalysis, PerformanceReport};
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

use super::render;
use crate::embedded::EmbeddedAgent;

#[derive(Args)]
pub struct ReportArgs {
    /// Request script, one request per line
    #[arg(short, long, value_name = "FILE")]
    pub script: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Failure reason given to the executor for `!` requests
const SCRIPTED_FAILURE: &str = "reported as failed by script";

/// A parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    pub input: String,
    pub force_failure: bool,
}

#[derive(Serialize)]
struct ReplayReport {
    requests: usize,
    performance: PerformanceReport,
    behavior: BehaviorAnalysis,
}

pub fn parse_script(script: &str) -> Vec<ScriptEntry> {
    script
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.strip_prefix('!') {
            Some(rest) => ScriptEntry {
                input: rest.trim().to_string(),
                force_failure: true,
            },
            None => ScriptEntry {
                input: line.to_string(),
                force_failure: false,
            },
        })
        .filter(|entry| !entry.input.is_empty())
        .collect()
}

pub async fn handle_command(args: ReportArgs, config_path: Option<PathBuf>) -> Result<()> {
    let script = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script {:?}", args.script))?;
    let entries = parse_script(&script);

    let embedded = EmbeddedAgent::new(config_path).await?;
    let report = replay(&embedded, &entries).await?;
    embedded.shutdown().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{} {}", "Requests replayed:".bold(), report.requests);
        println!();
        render::print_report(&report.performance);
        println!();
        render::print_behavior(&report.behavior);
    }

    Ok(())
}

async fn replay(embedded: &EmbeddedAgent, entries: &[ScriptEntry]) -> Result<ReplayReport> {
    let handle = embedded.handle();

    for entry in entries {
        if entry.force_failure {
            embedded.executor().fail_next(SCRIPTED_FAILURE);
        }

        let response = handle
            .handle(entry.input.as_str())
            .await
            .with_context(|| format!("Failed to handle request '{}'", entry.input))?;

        if entry.force_failure && embedded.executor().clear_staged_failure().is_some() {
            warn!(
                input = %entry.input,
                action = %response.decision.action,
                "Scripted failure not applied, request was not executed"
            );
        }
    }

    Ok(ReplayReport {
        requests: entries.len(),
        performance: handle.performance_report().await?,
        behavior: handle.analyze_behavior().await?,
    })
}
