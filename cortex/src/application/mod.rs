// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Application services for the Cortex bounded context

pub mod memory_store;
pub mod learning_monitor;

pub use memory_store::MemoryStore;
pub use learning_monitor::AdaptiveLearningMonitor;
