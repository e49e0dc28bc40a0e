// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Learning
//!
//! Performance samples, drift results and adaptation strategies produced by
//! the adaptive learning monitor.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Value types for the learning feedback loop

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::intent::CommandType;

/// Where a sample's accuracy value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracySource {
    /// Classifier confidence standing in for ground truth
    SelfReported,
    /// Explicit success/failure signal
    Feedback,
}

/// Ground-truth signal about one interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub success: bool,
}

impl Feedback {
    pub fn success() -> Self {
        Self { success: true }
    }

    pub fn failure() -> Self {
        Self { success: false }
    }
}

/// Outcome of acting on an interaction, as seen by the monitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningMetrics {
    pub accuracy: f64,
    pub accuracy_source: AccuracySource,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_type: Option<CommandType>,
    pub drift_score: f64,
    pub adaptation_rate: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptDrift {
    pub detected: bool,
    pub severity: f64,
    pub affected_concepts: Vec<CommandType>,
    pub timestamp: DateTime<Utc>,
}

impl ConceptDrift {
    pub fn none() -> Self {
        Self {
            detected: false,
            severity: 0.0,
            affected_concepts: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptationKind {
    Retrain,
    FineTune,
    Reset,
}

impl AdaptationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdaptationKind::Retrain => "retrain",
            AdaptationKind::FineTune => "fine_tune",
            AdaptationKind::Reset => "reset",
        }
    }
}

/// Component an adaptation strategy acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptiveComponent {
    IntentClassifier,
    ReasoningPipeline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationStrategy {
    pub kind: AdaptationKind,
    /// 1 is most urgent
    pub priority: u8,
    pub affected_components: Vec<AdaptiveComponent>,
    pub affected_concepts: Vec<CommandType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub overall_accuracy: f64,
    pub drift_status: ConceptDrift,
    pub adaptation_rate: f64,
    pub recommendations: Vec<String>,
}

/// Everything a single `record_interaction` call produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionOutcome {
    pub metrics: LearningMetrics,
    pub drift: ConceptDrift,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adaptation: Option<AppliedAdaptation>,
    /// New classifier learning rate, when meta-learning adjusted it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedAdaptation {
    pub strategy: AdaptationStrategy,
    /// Training examples handed to the classifier
    pub examples: usize,
}
