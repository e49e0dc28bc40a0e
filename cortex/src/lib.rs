// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Sentio Cortex
//!
//! Conversational memory and the adaptive learning monitor that closes the
//! perception → reasoning → decision → learning loop.
//!
//! # Architecture
//!
//! - **Layer:** Learning & Memory Layer
//! - **Purpose:** Owns conversation history, user preferences, rolling
//!   performance metrics and concept-drift adaptation

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
pub use application::{AdaptiveLearningMonitor, MemoryStore};
pub use infrastructure::*;
