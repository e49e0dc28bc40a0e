// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Intent Classification
//!
//! Command categories and the classifier contract the reasoning pipeline and
//! learning monitor depend on.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Defines `IntentClassifier` port and its value types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Coarse category of a user request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    File,
    App,
    Web,
    System,
}

impl CommandType {
    /// Every category, in classifier output order.
    pub const ALL: [CommandType; 4] = [
        CommandType::File,
        CommandType::App,
        CommandType::Web,
        CommandType::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::File => "FILE",
            CommandType::App => "APP",
            CommandType::Web => "WEB",
            CommandType::System => "SYSTEM",
        }
    }

    /// Position of this category in [`CommandType::ALL`].
    pub fn index(&self) -> usize {
        match self {
            CommandType::File => 0,
            CommandType::App => 1,
            CommandType::Web => 2,
            CommandType::System => 3,
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandType {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FILE" => Ok(CommandType::File),
            "APP" => Ok(CommandType::App),
            "WEB" => Ok(CommandType::Web),
            "SYSTEM" => Ok(CommandType::System),
            other => Err(ClassifierError::UnknownCommandType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentPrediction {
    pub command_type: CommandType,
    /// Heuristic score in [0, 1]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub input: String,
    pub command_type: CommandType,
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier not initialized")]
    NotInitialized,

    #[error("Invalid training data: {0}")]
    InvalidTrainingData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown command type: {0}")]
    UnknownCommandType(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

/// Maps free text onto a [`CommandType`].
///
/// Implementations own their model state behind interior mutability so the
/// monitor can retrain through a shared handle.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn predict(&self, text: &str) -> Result<IntentPrediction, ClassifierError>;

    /// Full training pass. `inputs` and `labels` are index-aligned.
    async fn train(&self, inputs: &[String], labels: &[CommandType]) -> Result<(), ClassifierError>;

    /// Incremental update from a small batch.
    async fn update_from_examples(&self, examples: &[TrainingExample]) -> Result<(), ClassifierError>;

    /// Discard learned state and return to the initial model.
    async fn initialize(&self) -> Result<(), ClassifierError>;

    async fn set_learning_rate(&self, rate: f64) -> Result<(), ClassifierError>;
}
