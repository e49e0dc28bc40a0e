// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Sentio Core
//!
//! Reasoning pipeline, uncertainty estimation and decision making for the
//! Sentio agent, wired to the memory and learning services of
//! `sentio-cortex`.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Reasoning & decision bounded context

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
