// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Keyword Intent Classifier
//!
//! Lexicon-based `IntentClassifier`. Each token carries one weight per
//! `CommandType`; a prediction sums the weights of the input tokens and
//! reports the winning category's share of the total as confidence.
//! Training adds weight to the tokens of labelled examples, scaled by the
//! current learning rate.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Reference classifier used by the CLI and integration tests

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

use crate::domain::{
    tokenize, ClassifierError, CommandType, IntentClassifier, IntentPrediction, TrainingExample,
};

const DEFAULT_LEARNING_RATE: f64 = 0.001;

/// Passes over the data a full `train` call makes; incremental updates make one.
const TRAIN_EPOCHS: f64 = 10.0;

const SEED_LEXICON: &[(CommandType, &[&str])] = &[
    (
        CommandType::File,
        &[
            "file", "files", "folder", "directory", "open", "read", "write", "copy", "move",
            "delete", "rename", "create", "save", "document", "path",
        ],
    ),
    (
        CommandType::App,
        &[
            "app", "application", "launch", "start", "close", "quit", "program", "window",
            "install", "uninstall",
        ],
    ),
    (
        CommandType::Web,
        &[
            "web", "browse", "browser", "search", "google", "url", "website", "http", "https",
            "download", "page", "navigate",
        ],
    ),
    (
        CommandType::System,
        &[
            "system", "volume", "brightness", "shutdown", "restart", "reboot", "settings", "cpu",
            "memory", "battery", "wifi", "network", "status",
        ],
    ),
];

type Weights = [f64; 4];

struct ClassifierState {
    lexicon: HashMap<String, Weights>,
    learning_rate: f64,
}

impl ClassifierState {
    fn seeded() -> Self {
        let mut lexicon: HashMap<String, Weights> = HashMap::new();
        for (command_type, words) in SEED_LEXICON {
            for word in *words {
                lexicon.entry((*word).to_string()).or_default()[command_type.index()] += 1.0;
            }
        }
        Self {
            lexicon,
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }

    /// Weight added per token occurrence for one epoch.
    fn step(&self) -> f64 {
        self.learning_rate / DEFAULT_LEARNING_RATE
    }

    fn learn(&mut self, input: &str, label: CommandType, epochs: f64) {
        let increment = self.step() * epochs / TRAIN_EPOCHS;
        for token in tokenize(input) {
            self.lexicon.entry(token).or_default()[label.index()] += increment;
        }
    }
}

pub struct KeywordIntentClassifier {
    state: RwLock<ClassifierState>,
}

impl KeywordIntentClassifier {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ClassifierState::seeded()),
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.state.read().learning_rate
    }

    pub fn lexicon_size(&self) -> usize {
        self.state.read().lexicon.len()
    }
}

impl Default for KeywordIntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentClassifier for KeywordIntentClassifier {
    async fn predict(&self, text: &str) -> Result<IntentPrediction, ClassifierError> {
        let state = self.state.read();
        let mut scores: Weights = [0.0; 4];
        for token in tokenize(text) {
            if let Some(weights) = state.lexicon.get(&token) {
                for (score, w) in scores.iter_mut().zip(weights) {
                    *score += w;
                }
            }
        }

        let total: f64 = scores.iter().sum();
        if total <= 0.0 {
            // nothing recognised: uniform over the categories
            return Ok(IntentPrediction {
                command_type: CommandType::System,
                confidence: 1.0 / CommandType::ALL.len() as f64,
            });
        }

        let mut best = 0usize;
        for (i, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = i;
            }
        }

        Ok(IntentPrediction {
            command_type: CommandType::ALL[best],
            confidence: scores[best] / total,
        })
    }

    async fn train(&self, inputs: &[String], labels: &[CommandType]) -> Result<(), ClassifierError> {
        if inputs.len() != labels.len() {
            return Err(ClassifierError::InvalidTrainingData(format!(
                "{} inputs but {} labels",
                inputs.len(),
                labels.len()
            )));
        }

        let mut state = self.state.write();
        for (input, label) in inputs.iter().zip(labels) {
            state.learn(input, *label, TRAIN_EPOCHS);
        }
        debug!(examples = inputs.len(), lexicon = state.lexicon.len(), "Classifier trained");
        Ok(())
    }

    async fn update_from_examples(&self, examples: &[TrainingExample]) -> Result<(), ClassifierError> {
        let mut state = self.state.write();
        for example in examples {
            state.learn(&example.input, example.command_type, 1.0);
        }
        debug!(examples = examples.len(), "Classifier updated incrementally");
        Ok(())
    }

    async fn initialize(&self) -> Result<(), ClassifierError> {
        *self.state.write() = ClassifierState::seeded();
        debug!("Classifier reset to seed lexicon");
        Ok(())
    }

    async fn set_learning_rate(&self, rate: f64) -> Result<(), ClassifierError> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(ClassifierError::InvalidParameter(format!(
                "learning rate must be positive, got {rate}"
            )));
        }
        self.state.write().learning_rate = rate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_lexicon_predictions() {
        let classifier = KeywordIntentClassifier::new();

        let file = classifier.predict("open file report.txt").await.unwrap();
        assert_eq!(file.command_type, CommandType::File);
        assert!(file.confidence >= 0.8);

        let web = classifier.predict("search the web for rust").await.unwrap();
        assert_eq!(web.command_type, CommandType::Web);

        let unknown = classifier.predict("xyzzy").await.unwrap();
        assert_eq!(unknown.confidence, 0.25);
    }

    #[tokio::test]
    async fn test_training_shifts_prediction() {
        let classifier = KeywordIntentClassifier::new();
        let inputs = vec!["play spotify".to_string()];
        classifier.train(&inputs, &[CommandType::App]).await.unwrap();

        let prediction = classifier.predict("spotify").await.unwrap();
        assert_eq!(prediction.command_type, CommandType::App);
        assert_eq!(prediction.confidence, 1.0);

        classifier.initialize().await.unwrap();
        let reset = classifier.predict("spotify").await.unwrap();
        assert_eq!(reset.confidence, 0.25);
    }

    #[tokio::test]
    async fn test_train_rejects_misaligned_labels() {
        let classifier = KeywordIntentClassifier::new();
        let inputs = vec!["a".to_string(), "b".to_string()];
        let err = classifier.train(&inputs, &[CommandType::Web]).await.unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidTrainingData(_)));
    }

    #[tokio::test]
    async fn test_learning_rate_validation() {
        let classifier = KeywordIntentClassifier::new();
        assert!(classifier.set_learning_rate(0.0).await.is_err());
        classifier.set_learning_rate(0.002).await.unwrap();
        assert_eq!(classifier.learning_rate(), 0.002);
    }
}
