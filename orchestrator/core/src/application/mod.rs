// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod agent;
pub mod decision_maker;
pub mod history_pruner;
pub mod reasoning_pipeline;
pub mod session;
pub mod uncertainty;

// Re-export services for convenience
pub use agent::{Agent, AgentResponse, CLARIFY_ACTION};
pub use decision_maker::DecisionMaker;
pub use history_pruner::HistoryPruner;
pub use reasoning_pipeline::ReasoningPipeline;
pub use session::AgentHandle;
pub use uncertainty::UncertaintyEstimator;
