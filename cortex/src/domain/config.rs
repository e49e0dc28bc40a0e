// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Cortex Configuration
//!
//! Tunables for conversational memory and the learning monitor. Both structs
//! are embedded in the agent manifest's `spec.memory` and `spec.learning`
//! sections, so every field carries a serde default.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Heuristic constants as named, overridable values

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Maximum turns retained; oldest are evicted first
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Minimum cosine similarity for a turn to count as relevant
    #[serde(default = "default_relevance_threshold")]
    pub relevance_threshold: f64,

    /// Result size of `find_relevant` when the caller does not pick one
    #[serde(default = "default_relevant_limit")]
    pub relevant_limit: usize,

    /// Turns older than this are dropped by `purge_expired`
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,

    #[serde(default = "default_common_pattern_limit")]
    pub common_pattern_limit: usize,

    #[serde(default = "default_preferred_command_limit")]
    pub preferred_command_limit: usize,

    #[serde(default = "default_error_pattern_limit")]
    pub error_pattern_limit: usize,
}

fn default_max_history() -> usize {
    100
}

fn default_relevance_threshold() -> f64 {
    0.7
}

fn default_relevant_limit() -> usize {
    5
}

fn default_retention_days() -> i64 {
    7
}

fn default_common_pattern_limit() -> usize {
    10
}

fn default_preferred_command_limit() -> usize {
    5
}

fn default_error_pattern_limit() -> usize {
    5
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
            relevance_threshold: default_relevance_threshold(),
            relevant_limit: default_relevant_limit(),
            retention_days: default_retention_days(),
            common_pattern_limit: default_common_pattern_limit(),
            preferred_command_limit: default_preferred_command_limit(),
            error_pattern_limit: default_error_pattern_limit(),
        }
    }
}

impl MemoryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_history == 0 {
            bail!("memory.max_history must be greater than 0");
        }
        if !(0.0..=1.0).contains(&self.relevance_threshold) {
            bail!("memory.relevance_threshold must be within [0, 1]");
        }
        if self.retention_days <= 0 {
            bail!("memory.retention_days must be positive");
        }
        Ok(())
    }
}

/// Weights of the per-sample drift score. Must sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftScoreWeights {
    #[serde(default = "default_confidence_deficit_weight")]
    pub confidence_deficit: f64,
    #[serde(default = "default_volatility_weight")]
    pub volatility: f64,
    #[serde(default = "default_context_drift_weight")]
    pub context_drift: f64,
}

fn default_confidence_deficit_weight() -> f64 {
    0.4
}

fn default_volatility_weight() -> f64 {
    0.3
}

fn default_context_drift_weight() -> f64 {
    0.3
}

impl Default for DriftScoreWeights {
    fn default() -> Self {
        Self {
            confidence_deficit: default_confidence_deficit_weight(),
            volatility: default_volatility_weight(),
            context_drift: default_context_drift_weight(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Maximum samples kept in the metrics window
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Size of each trailing window compared by drift detection
    #[serde(default = "default_drift_window")]
    pub drift_window: usize,

    /// Severity (and per-concept delta) above which drift is reported
    #[serde(default = "default_drift_threshold")]
    pub drift_threshold: f64,

    /// Accuracy above which a sample counts as "high" for concept drift
    #[serde(default = "default_high_accuracy")]
    pub high_accuracy: f64,

    /// Severity above which a full retrain is chosen
    #[serde(default = "default_retrain_severity")]
    pub retrain_severity: f64,

    /// Severity above which fine-tuning is urgent
    #[serde(default = "default_fine_tune_severity")]
    pub fine_tune_severity: f64,

    /// Sample accuracy below which the learning rate is rescaled
    #[serde(default = "default_adaptation_threshold")]
    pub adaptation_threshold: f64,

    /// Samples used for drift score and adaptation rate
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,

    /// Samples used for the performance report accuracy
    #[serde(default = "default_report_window")]
    pub report_window: usize,

    #[serde(default = "default_base_learning_rate")]
    pub base_learning_rate: f64,

    /// Adaptation rate reported while fewer than two samples exist
    #[serde(default = "default_initial_adaptation_rate")]
    pub initial_adaptation_rate: f64,

    /// Report accuracy below which more training data is recommended
    #[serde(default = "default_target_accuracy")]
    pub target_accuracy: f64,

    #[serde(default)]
    pub drift_weights: DriftScoreWeights,
}

fn default_history_window() -> usize {
    1000
}

fn default_drift_window() -> usize {
    50
}

fn default_drift_threshold() -> f64 {
    0.15
}

fn default_high_accuracy() -> f64 {
    0.8
}

fn default_retrain_severity() -> f64 {
    0.5
}

fn default_fine_tune_severity() -> f64 {
    0.3
}

fn default_adaptation_threshold() -> f64 {
    0.2
}

fn default_recent_window() -> usize {
    10
}

fn default_report_window() -> usize {
    100
}

fn default_base_learning_rate() -> f64 {
    0.001
}

fn default_initial_adaptation_rate() -> f64 {
    0.1
}

fn default_target_accuracy() -> f64 {
    0.8
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            drift_window: default_drift_window(),
            drift_threshold: default_drift_threshold(),
            high_accuracy: default_high_accuracy(),
            retrain_severity: default_retrain_severity(),
            fine_tune_severity: default_fine_tune_severity(),
            adaptation_threshold: default_adaptation_threshold(),
            recent_window: default_recent_window(),
            report_window: default_report_window(),
            base_learning_rate: default_base_learning_rate(),
            initial_adaptation_rate: default_initial_adaptation_rate(),
            target_accuracy: default_target_accuracy(),
            drift_weights: DriftScoreWeights::default(),
        }
    }
}

impl LearningConfig {
    pub fn validate(&self) -> Result<()> {
        if self.drift_window == 0 || self.recent_window == 0 || self.report_window == 0 {
            bail!("learning windows must be greater than 0");
        }
        if self.history_window < self.drift_window * 2 {
            bail!(
                "learning.history_window ({}) must hold two drift windows ({})",
                self.history_window,
                self.drift_window * 2
            );
        }
        if self.fine_tune_severity > self.retrain_severity {
            bail!("learning.fine_tune_severity must not exceed learning.retrain_severity");
        }
        if self.base_learning_rate <= 0.0 {
            bail!("learning.base_learning_rate must be positive");
        }
        let w = &self.drift_weights;
        let sum = w.confidence_deficit + w.volatility + w.context_drift;
        if (sum - 1.0).abs() > 1e-6 {
            bail!("learning.drift_weights must sum to 1 (got {sum})");
        }
        Ok(())
    }
}
