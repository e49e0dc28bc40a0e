// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Interactive session
//!
//! Plain lines are requests. Lines starting with `:` are session commands.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::render;
use crate::embedded::EmbeddedAgent;

#[derive(Args)]
pub struct ReplArgs {
    /// Print domain events after each request
    #[arg(long)]
    pub events: bool,

    /// Include the reasoning explanation
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplLine {
    Request(String),
    Report,
    Behavior,
    ToggleEvents,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

pub fn parse_line(line: &str) -> ReplLine {
    let line = line.trim();
    match line {
        "" => ReplLine::Empty,
        ":report" => ReplLine::Report,
        ":behavior" => ReplLine::Behavior,
        ":events" => ReplLine::ToggleEvents,
        ":help" => ReplLine::Help,
        ":quit" | ":exit" => ReplLine::Quit,
        other if other.starts_with(':') => ReplLine::Unknown(other.to_string()),
        request => ReplLine::Request(request.to_string()),
    }
}

fn print_help() {
    println!("{}", "Session commands:".bold());
    println!("  :report     Show the learning performance report");
    println!("  :behavior   Show behavior analysis over the history");
    println!("  :events     Toggle event output");
    println!("  :quit       Leave the session");
}

pub async fn handle_command(args: ReplArgs, config_path: Option<PathBuf>) -> Result<()> {
    let embedded = EmbeddedAgent::new(config_path).await?;
    let mut events = embedded.subscribe();
    let mut show_events = args.events;

    println!(
        "{} {} {}",
        "Sentio agent".bold(),
        embedded.manifest().metadata.name.cyan(),
        "(type :help for commands)".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".green());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_line(&line) {
            ReplLine::Empty => {}
            ReplLine::Request(request) => match embedded.handle().handle(request).await {
                Ok(response) => render::print_response(&response, args.verbose),
                Err(e) => println!("{}", format!("✗ {}", e).red()),
            },
            ReplLine::Report => render::print_report(&embedded.handle().performance_report().await?),
            ReplLine::Behavior => render::print_behavior(&embedded.handle().analyze_behavior().await?),
            ReplLine::ToggleEvents => {
                show_events = !show_events;
                println!("Event output {}", if show_events { "on" } else { "off" });
            }
            ReplLine::Help => print_help(),
            ReplLine::Quit => break,
            ReplLine::Unknown(command) => {
                println!("{}", format!("Unknown command '{}'", command).yellow());
            }
        }

        if show_events {
            render::drain_events(&mut events);
        } else {
            // Keep the receiver from lagging while output is off
            while events.try_recv().is_ok() {}
        }
    }

    embedded.shutdown().await?;
    Ok(())
}
