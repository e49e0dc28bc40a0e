// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! One-shot request handling

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::render;
use crate::embedded::EmbeddedAgent;

#[derive(Args)]
pub struct RunArgs {
    /// Requests to handle, in order
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,

    /// Print each response as JSON
    #[arg(long)]
    pub json: bool,

    /// Print domain events after each request
    #[arg(long)]
    pub events: bool,

    /// Include the reasoning explanation
    #[arg(short, long)]
    pub verbose: bool,
}

pub async fn handle_command(args: RunArgs, config_path: Option<PathBuf>) -> Result<()> {
    let embedded = EmbeddedAgent::new(config_path).await?;
    let mut events = embedded.subscribe();

    for input in &args.inputs {
        let response = embedded
            .handle()
            .handle(input.as_str())
            .await
            .with_context(|| format!("Failed to handle request '{}'", input))?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            render::print_response(&response, args.verbose);
        }

        if args.events {
            render::drain_events(&mut events);
        }
    }

    embedded.shutdown().await?;
    Ok(())
}
