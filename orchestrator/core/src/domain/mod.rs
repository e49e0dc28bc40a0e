// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Reasoning traces, decisions, executor contract and agent configuration.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Types shared by the reasoning and decision services

pub mod agent_config;
pub mod decision;
pub mod error;
pub mod events;
pub mod executor;
pub mod reasoning;

pub use agent_config::*;
pub use decision::*;
pub use error::*;
pub use events::*;
pub use executor::*;
pub use reasoning::*;
