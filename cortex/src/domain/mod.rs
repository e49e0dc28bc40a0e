// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Types and collaborator contracts for the Cortex bounded context.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Conversation, learning and configuration types

pub mod config;
pub mod conversation;
pub mod embedding;
pub mod error;
pub mod events;
pub mod intent;
pub mod learning;

pub use config::*;
pub use conversation::*;
pub use embedding::*;
pub use error::*;
pub use events::*;
pub use intent::*;
pub use learning::*;
