// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Decision
//!
//! Decisions, their decomposed uncertainty and the mitigation strategies
//! applied before execution.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Value types for the decision stage

use chrono::{DateTime, Utc};
use sentio_cortex::domain::ResourceUsage;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::reasoning::ActionParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionId(pub Uuid);

impl DecisionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DecisionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Deterministic transformation applied to a low-confidence decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MitigationStrategy {
    CollectTrainingData,
    RequestConfirmation,
    ConservativeParameters,
    RefreshContext,
    ConsiderRecentChanges,
}

impl MitigationStrategy {
    pub fn description(&self) -> &'static str {
        match self {
            MitigationStrategy::CollectTrainingData => "Collect more training data for model improvement",
            MitigationStrategy::RequestConfirmation => "Request additional confirmation from user",
            MitigationStrategy::ConservativeParameters => "Use more conservative action parameters",
            MitigationStrategy::RefreshContext => "Refresh context information",
            MitigationStrategy::ConsiderRecentChanges => "Consider recent system changes",
        }
    }
}

impl fmt::Display for MitigationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UncertaintySources {
    pub model: f64,
    pub data: f64,
    pub context: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyEstimate {
    /// Weighted sum of the sources, in [0, 1]
    pub total: f64,
    pub sources: UncertaintySources,
    pub mitigation_strategies: Vec<MitigationStrategy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tradeoffs {
    pub advantages: Vec<String>,
    pub disadvantages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub action: String,
    pub parameters: ActionParameters,
    pub confidence: f64,
    pub tradeoffs: Tradeoffs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: DecisionId,
    /// Request the decision answers
    pub input: String,
    pub action: String,
    pub parameters: ActionParameters,
    pub confidence: f64,
    pub uncertainty: UncertaintyEstimate,
    pub explanation: String,
    pub alternatives: Vec<Alternative>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionMetrics {
    pub execution_time_ms: u64,
    pub resource_usage: ResourceUsage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub decision_id: DecisionId,
    pub action: String,
    /// Parameters as executed, after mitigation
    pub parameters: ActionParameters,
    /// Strategies applied before execution, in order
    pub applied_mitigations: Vec<MitigationStrategy>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the outcome could not be reported to the learning monitor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_error: Option<String>,
    pub metrics: ExecutionMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mitigation_serializes_snake_case() {
        let json = serde_json::to_string(&MitigationStrategy::ConservativeParameters).unwrap();
        assert_eq!(json, "\"conservative_parameters\"");
        assert_eq!(
            MitigationStrategy::RefreshContext.to_string(),
            "Refresh context information"
        );
    }
}
