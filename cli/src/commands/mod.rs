// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for Sentio CLI

pub mod config;
pub mod render;
pub mod repl;
pub mod report;
pub mod run;

pub use self::config::ConfigCommand;
pub use self::repl::ReplArgs;
pub use self::report::ReportArgs;
pub use self::run::RunArgs;
