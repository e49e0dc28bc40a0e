// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod dry_run_executor;
pub mod event_bus;

pub use dry_run_executor::{DryRunExecutor, RecordedAction};
pub use event_bus::{DomainEvent, EventBus, EventBusError, EventReceiver};
