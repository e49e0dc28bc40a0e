// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Reasoning
//!
//! Records produced by the five-stage reasoning pipeline: per-stage inputs
//! and outputs, hypotheses, validation verdicts and action plans.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Typed reasoning trace consumed by the decision maker

use chrono::{DateTime, Utc};
use sentio_cortex::domain::{
    CommandType, ContextSummary, ConversationTurn, SystemState, TurnMetadata, UserPreference,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Understanding,
    Context,
    Hypothesis,
    Validation,
    Planning,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Understanding => "understanding",
            StepKind::Context => "context",
            StepKind::Hypothesis => "hypothesis",
            StepKind::Validation => "validation",
            StepKind::Planning => "planning",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the understanding stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Understanding {
    pub intent: CommandType,
    pub confidence: f64,
    /// `path` plus any `key=value` pairs found in the input
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub entities: BTreeMap<String, String>,
}

/// Output of the context stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextAnalysis {
    pub relevant_history: Vec<ConversationTurn>,
    /// Preferences whose category mentions the intent
    pub preferences: Vec<UserPreference>,
    pub system_state: SystemState,
}

impl ContextAnalysis {
    /// Timestamp of the newest relevant turn.
    pub fn newest_turn(&self) -> Option<DateTime<Utc>> {
        self.relevant_history.iter().map(|t| t.timestamp).max()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub id: Uuid,
    pub description: String,
    pub confidence: f64,
    pub supporting_evidence: Vec<String>,
    pub counter_evidence: Vec<String>,
}

impl Hypothesis {
    pub fn new(description: impl Into<String>, confidence: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            confidence,
            supporting_evidence: Vec::new(),
            counter_evidence: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub constraints_satisfied: bool,
    pub risks_acceptable: bool,
    pub resources_available: bool,
}

/// Parameters handed to the executor.
///
/// Known keys are typed; executor-specific values go in `extra`. Timeout and
/// retries stay unset until the decision maker seeds them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_type: Option<CommandType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub entities: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    #[serde(default)]
    pub safe_mode: bool,
    #[serde(default)]
    pub require_confirmation: bool,
    #[serde(default)]
    pub validation_checks: bool,
    /// Refreshed memory attached by the context mitigation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextSummary>,
    /// Hypothesis a fallback step stands in for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_hypothesis: Option<Box<Hypothesis>>,
    /// Metadata of the past turn a historical alternative replays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precedent: Option<TurnMetadata>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionStep {
    pub action: String,
    pub parameters: ActionParameters,
    pub expected_outcome: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub steps: Vec<ActionStep>,
    pub estimated_success: f64,
    pub potential_risks: Vec<String>,
}

/// What a stage was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StepInput {
    Understanding { text: String },
    Context { text: String, understanding: Understanding },
    Hypothesis { understanding: Understanding, context: ContextAnalysis },
    Validation { hypothesis: Hypothesis },
    Planning { hypothesis: Hypothesis },
}

/// What a stage produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "output", rename_all = "snake_case")]
pub enum StepOutput {
    Understanding(Understanding),
    Context(ContextAnalysis),
    Hypotheses(Vec<Hypothesis>),
    Validation(ValidationOutcome),
    Plan(ActionPlan),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub id: Uuid,
    pub kind: StepKind,
    pub input: StepInput,
    pub output: StepOutput,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

impl ReasoningStep {
    pub fn new(kind: StepKind, input: StepInput, output: StepOutput, confidence: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            input,
            output,
            confidence,
            timestamp: Utc::now(),
        }
    }

    /// Output rendered for explanations.
    pub fn output_json(&self) -> String {
        let rendered = match &self.output {
            StepOutput::Understanding(v) => serde_json::to_string(v),
            StepOutput::Context(v) => serde_json::to_string(v),
            StepOutput::Hypotheses(v) => serde_json::to_string(v),
            StepOutput::Validation(v) => serde_json::to_string(v),
            StepOutput::Plan(v) => serde_json::to_string(v),
        };
        rendered.unwrap_or_else(|e| format!("<unrenderable: {e}>"))
    }
}

/// Full trace of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningResult {
    pub steps: Vec<ReasoningStep>,
    pub final_hypothesis: Hypothesis,
    pub action_plan: ActionPlan,
    pub confidence: f64,
    pub explanation: String,
}

impl ReasoningResult {
    pub fn step(&self, kind: StepKind) -> Option<&ReasoningStep> {
        self.steps.iter().find(|s| s.kind == kind)
    }

    pub fn understanding(&self) -> Option<&Understanding> {
        self.steps.iter().find_map(|s| match &s.output {
            StepOutput::Understanding(u) => Some(u),
            _ => None,
        })
    }

    pub fn context(&self) -> Option<&ContextAnalysis> {
        self.steps.iter().find_map(|s| match &s.output {
            StepOutput::Context(c) => Some(c),
            _ => None,
        })
    }

    pub fn first_step(&self) -> Option<&ActionStep> {
        self.action_plan.steps.first()
    }
}
