// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Adaptive Learning Monitor
//!
//! Keeps a rolling window of performance samples, compares two trailing
//! windows for concept drift and adapts the intent classifier when drift is
//! found.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Learning side of the feedback loop

use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::application::MemoryStore;
use crate::domain::{
    AccuracySource, AdaptationKind, AdaptationStrategy, AdaptiveComponent, AppliedAdaptation,
    CommandType, ConceptDrift, CortexError, Feedback, IntentClassifier, InteractionOutcome,
    InteractionResult, LearningConfig, LearningMetrics, PerformanceReport, TrainingExample,
};

pub struct AdaptiveLearningMonitor {
    classifier: Arc<dyn IntentClassifier>,
    config: LearningConfig,
    metrics: VecDeque<LearningMetrics>,
    learning_rate: f64,
}

impl AdaptiveLearningMonitor {
    pub fn new(classifier: Arc<dyn IntentClassifier>, config: LearningConfig) -> Self {
        Self {
            classifier,
            learning_rate: config.base_learning_rate,
            metrics: VecDeque::with_capacity(config.history_window),
            config,
        }
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    /// Samples in the window, oldest first.
    pub fn metrics(&self) -> impl Iterator<Item = &LearningMetrics> {
        self.metrics.iter()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Learning rate last pushed to the classifier.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Score one interaction, append it to the window and react to drift.
    ///
    /// Any adaptation is applied before this returns.
    pub async fn record_interaction(
        &mut self,
        memory: &MemoryStore,
        input: &str,
        result: &InteractionResult,
        feedback: Option<&Feedback>,
    ) -> Result<InteractionOutcome, CortexError> {
        let prediction = self.classifier.predict(input).await?;
        let context = memory.summarize(input).await?;
        let behavior = memory.analyze_behavior();

        let (accuracy, accuracy_source) = match feedback {
            Some(feedback) => (if feedback.success { 1.0 } else { 0.0 }, AccuracySource::Feedback),
            None => (prediction.confidence, AccuracySource::SelfReported),
        };

        let drift_score = self.sample_drift_score(
            prediction.confidence,
            context.relevant_history.len(),
            behavior.common_patterns.len(),
        );
        let adaptation_rate = self.adaptation_rate_with(accuracy);

        let sample = LearningMetrics {
            accuracy,
            accuracy_source,
            confidence: prediction.confidence,
            command_type: Some(prediction.command_type),
            drift_score,
            adaptation_rate,
            timestamp: Utc::now(),
        };

        debug!(
            accuracy,
            source = ?accuracy_source,
            confidence = prediction.confidence,
            drift_score,
            adaptation_rate,
            result_success = result.success,
            "Recorded interaction sample"
        );

        self.metrics.push_back(sample.clone());
        while self.metrics.len() > self.config.history_window {
            self.metrics.pop_front();
        }

        let drift = self.detect_concept_drift();
        let adaptation = if drift.detected {
            warn!(
                severity = drift.severity,
                affected = ?drift.affected_concepts,
                "Concept drift detected"
            );
            let strategy = self.select_strategy(&drift);
            let examples = self.apply_strategy(memory, &strategy).await?;
            Some(AppliedAdaptation { strategy, examples })
        } else {
            None
        };

        let learning_rate = self.update_meta_learning(&sample).await?;

        Ok(InteractionOutcome {
            metrics: sample,
            drift,
            adaptation,
            learning_rate,
        })
    }

    /// Compare the last `drift_window` samples with the window before them.
    pub fn detect_concept_drift(&self) -> ConceptDrift {
        let n = self.metrics.len();
        let w = self.config.drift_window;
        if n < w {
            return ConceptDrift::none();
        }

        let recent: Vec<&LearningMetrics> = self.metrics.range(n - w..n).collect();
        let prior: Vec<&LearningMetrics> = self.metrics.range(n.saturating_sub(2 * w)..n - w).collect();
        if prior.is_empty() {
            return ConceptDrift::none();
        }

        let accuracy_delta = (mean(recent.iter().map(|m| m.accuracy))
            - mean(prior.iter().map(|m| m.accuracy)))
        .abs();
        let confidence_delta = (mean(recent.iter().map(|m| m.confidence))
            - mean(prior.iter().map(|m| m.confidence)))
        .abs();
        let severity = accuracy_delta + confidence_delta;

        ConceptDrift {
            detected: severity > self.config.drift_threshold,
            severity,
            affected_concepts: self.affected_concepts(&recent, &prior),
            timestamp: Utc::now(),
        }
    }

    fn affected_concepts(&self, recent: &[&LearningMetrics], prior: &[&LearningMetrics]) -> Vec<CommandType> {
        CommandType::ALL
            .into_iter()
            .filter(|ty| {
                let seen = |window: &[&LearningMetrics]| window.iter().any(|m| m.command_type == Some(*ty));
                seen(recent) || seen(prior)
            })
            .filter(|ty| {
                let delta = self.high_accuracy_fraction(recent, *ty) - self.high_accuracy_fraction(prior, *ty);
                delta.abs() > self.config.drift_threshold
            })
            .collect()
    }

    fn high_accuracy_fraction(&self, window: &[&LearningMetrics], ty: CommandType) -> f64 {
        let of_type: Vec<&&LearningMetrics> = window.iter().filter(|m| m.command_type == Some(ty)).collect();
        if of_type.is_empty() {
            return 0.0;
        }
        let high = of_type.iter().filter(|m| m.accuracy > self.config.high_accuracy).count();
        high as f64 / of_type.len() as f64
    }

    pub fn select_strategy(&self, drift: &ConceptDrift) -> AdaptationStrategy {
        if drift.severity > self.config.retrain_severity {
            AdaptationStrategy {
                kind: AdaptationKind::Retrain,
                priority: 1,
                affected_components: vec![
                    AdaptiveComponent::IntentClassifier,
                    AdaptiveComponent::ReasoningPipeline,
                ],
                affected_concepts: drift.affected_concepts.clone(),
            }
        } else {
            let priority = if drift.severity > self.config.fine_tune_severity { 2 } else { 3 };
            AdaptationStrategy {
                kind: AdaptationKind::FineTune,
                priority,
                affected_components: vec![AdaptiveComponent::IntentClassifier],
                affected_concepts: drift.affected_concepts.clone(),
            }
        }
    }

    /// Run `strategy` against the classifier. Returns the number of training
    /// examples used.
    pub async fn apply_strategy(
        &self,
        memory: &MemoryStore,
        strategy: &AdaptationStrategy,
    ) -> Result<usize, CortexError> {
        let examples = match strategy.kind {
            AdaptationKind::Retrain => {
                let (inputs, labels): (Vec<String>, Vec<CommandType>) = memory
                    .successful_turns()
                    .filter_map(|turn| turn.metadata.intent.map(|intent| (turn.input.clone(), intent)))
                    .unzip();
                if !inputs.is_empty() {
                    self.classifier.train(&inputs, &labels).await?;
                }
                inputs.len()
            }
            AdaptationKind::FineTune => {
                let examples: Vec<TrainingExample> = memory
                    .successful_turns()
                    .filter_map(|turn| {
                        turn.metadata
                            .intent
                            .filter(|intent| strategy.affected_concepts.contains(intent))
                            .map(|intent| TrainingExample {
                                input: turn.input.clone(),
                                command_type: intent,
                            })
                    })
                    .collect();
                if !examples.is_empty() {
                    self.classifier.update_from_examples(&examples).await?;
                }
                examples.len()
            }
            AdaptationKind::Reset => {
                for component in &strategy.affected_components {
                    match component {
                        AdaptiveComponent::IntentClassifier => self.classifier.initialize().await?,
                        AdaptiveComponent::ReasoningPipeline => {
                            debug!("Reasoning pipeline holds no learned state; nothing to reset");
                        }
                    }
                }
                0
            }
        };

        info!(
            kind = strategy.kind.as_str(),
            priority = strategy.priority,
            examples,
            "Applied adaptation strategy"
        );
        Ok(examples)
    }

    pub fn performance_report(&self) -> PerformanceReport {
        let n = self.metrics.len();
        let window = n.min(self.config.report_window);
        let overall_accuracy = mean(self.metrics.range(n - window..n).map(|m| m.accuracy));

        let drift_status = self.detect_concept_drift();
        let recent = n.min(self.config.recent_window);
        let accuracies: Vec<f64> = self.metrics.range(n - recent..n).map(|m| m.accuracy).collect();
        let adaptation_rate = self.adaptation_rate(&accuracies);

        let mut recommendations = Vec::new();
        if drift_status.detected {
            let concepts: Vec<&str> = drift_status.affected_concepts.iter().map(|c| c.as_str()).collect();
            recommendations.push(format!("Concept drift detected in: {}", concepts.join(", ")));
        }
        if overall_accuracy < self.config.target_accuracy {
            recommendations.push("Consider collecting more training data".to_string());
        }

        PerformanceReport {
            overall_accuracy,
            drift_status,
            adaptation_rate,
            recommendations,
        }
    }

    /// Drift score for a new sample, measured against the samples already in
    /// the window.
    fn sample_drift_score(&self, confidence: f64, relevant_history: usize, common_patterns: usize) -> f64 {
        let n = self.metrics.len();
        let recent: Vec<f64> = self
            .metrics
            .range(n - n.min(self.config.recent_window)..n)
            .map(|m| m.confidence)
            .collect();

        let (average_confidence, volatility) = if recent.is_empty() {
            (confidence, 0.0)
        } else {
            let volatility = if recent.len() < 2 {
                0.0
            } else {
                mean(recent.windows(2).map(|pair| (pair[1] - pair[0]).abs()))
            };
            (mean(recent.iter().copied()), volatility)
        };

        let largest = relevant_history.max(common_patterns);
        let context_drift = if largest == 0 {
            0.0
        } else {
            relevant_history.abs_diff(common_patterns) as f64 / largest as f64
        };

        let w = &self.config.drift_weights;
        (1.0 - average_confidence) * w.confidence_deficit
            + volatility * w.volatility
            + context_drift * w.context_drift
    }

    /// Adaptation rate over the trailing samples plus a pending accuracy.
    fn adaptation_rate_with(&self, accuracy: f64) -> f64 {
        let n = self.metrics.len();
        let keep = n.min(self.config.recent_window.saturating_sub(1));
        let mut accuracies: Vec<f64> = self.metrics.range(n - keep..n).map(|m| m.accuracy).collect();
        accuracies.push(accuracy);
        self.adaptation_rate(&accuracies)
    }

    /// Fraction of consecutive pairs whose accuracy strictly increased.
    fn adaptation_rate(&self, accuracies: &[f64]) -> f64 {
        if accuracies.len() < 2 {
            return self.config.initial_adaptation_rate;
        }
        let improvements = accuracies.windows(2).filter(|pair| pair[1] > pair[0]).count();
        improvements as f64 / (accuracies.len() - 1) as f64
    }

    async fn update_meta_learning(&mut self, sample: &LearningMetrics) -> Result<Option<f64>, CortexError> {
        if sample.accuracy >= self.config.adaptation_threshold {
            return Ok(None);
        }

        let rate = self.config.base_learning_rate * (1.0 + sample.adaptation_rate);
        self.classifier.set_learning_rate(rate).await?;
        info!(old_rate = self.learning_rate, new_rate = rate, "Adjusted classifier learning rate");
        self.learning_rate = rate;
        Ok(Some(rate))
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ClassifierError, EncoderError, IntentPrediction, MemoryConfig, TextEncoder, TurnMetadata,
    };
    use async_trait::async_trait;

    #[derive(Default)]
    struct ClassifierCalls {
        train: Vec<usize>,
        update: Vec<usize>,
        initialize: usize,
        learning_rates: Vec<f64>,
    }

    /// Returns scripted predictions in order, repeating the last one.
    struct ScriptedClassifier {
        script: tokio::sync::Mutex<VecDeque<IntentPrediction>>,
        last: tokio::sync::Mutex<IntentPrediction>,
        calls: Arc<tokio::sync::Mutex<ClassifierCalls>>,
    }

    impl ScriptedClassifier {
        fn constant(command_type: CommandType, confidence: f64) -> Self {
            Self::scripted(vec![IntentPrediction { command_type, confidence }])
        }

        fn scripted(script: Vec<IntentPrediction>) -> Self {
            let first = script[0];
            Self {
                script: tokio::sync::Mutex::new(script.into()),
                last: tokio::sync::Mutex::new(first),
                calls: Arc::new(tokio::sync::Mutex::new(ClassifierCalls::default())),
            }
        }
    }

    #[async_trait]
    impl IntentClassifier for ScriptedClassifier {
        async fn predict(&self, _text: &str) -> Result<IntentPrediction, ClassifierError> {
            let mut last = self.last.lock().await;
            if let Some(next) = self.script.lock().await.pop_front() {
                *last = next;
            }
            Ok(*last)
        }

        async fn train(&self, inputs: &[String], _labels: &[CommandType]) -> Result<(), ClassifierError> {
            self.calls.lock().await.train.push(inputs.len());
            Ok(())
        }

        async fn update_from_examples(&self, examples: &[TrainingExample]) -> Result<(), ClassifierError> {
            self.calls.lock().await.update.push(examples.len());
            Ok(())
        }

        async fn initialize(&self) -> Result<(), ClassifierError> {
            self.calls.lock().await.initialize += 1;
            Ok(())
        }

        async fn set_learning_rate(&self, rate: f64) -> Result<(), ClassifierError> {
            self.calls.lock().await.learning_rates.push(rate);
            Ok(())
        }
    }

    struct FlatEncoder;

    #[async_trait]
    impl TextEncoder for FlatEncoder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EncoderError> {
            Ok(vec![1.0, 0.0])
        }
    }

    fn memory() -> MemoryStore {
        MemoryStore::new(Arc::new(FlatEncoder), MemoryConfig::default())
    }

    fn ok() -> InteractionResult {
        InteractionResult {
            success: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_accuracy_source_follows_feedback() {
        let classifier = Arc::new(ScriptedClassifier::constant(CommandType::File, 0.9));
        let mut monitor = AdaptiveLearningMonitor::new(classifier, LearningConfig::default());
        let memory = memory();

        let self_reported = monitor.record_interaction(&memory, "open a file", &ok(), None).await.unwrap();
        assert_eq!(self_reported.metrics.accuracy, 0.9);
        assert_eq!(self_reported.metrics.accuracy_source, AccuracySource::SelfReported);

        let failed = monitor
            .record_interaction(&memory, "open a file", &ok(), Some(&Feedback::failure()))
            .await
            .unwrap();
        assert_eq!(failed.metrics.accuracy, 0.0);
        assert_eq!(failed.metrics.accuracy_source, AccuracySource::Feedback);
        assert_eq!(failed.metrics.command_type, Some(CommandType::File));
    }

    #[tokio::test]
    async fn test_adaptation_rate_for_constant_confidence() {
        let classifier = Arc::new(ScriptedClassifier::constant(CommandType::Web, 0.95));
        let mut monitor = AdaptiveLearningMonitor::new(classifier, LearningConfig::default());
        let memory = memory();

        let first = monitor.record_interaction(&memory, "search the web", &ok(), None).await.unwrap();
        assert_eq!(first.metrics.adaptation_rate, 0.1);

        for _ in 0..9 {
            monitor.record_interaction(&memory, "search the web", &ok(), None).await.unwrap();
        }

        let report = monitor.performance_report();
        assert_eq!(report.adaptation_rate, 0.0);
        assert!((report.overall_accuracy - 0.95).abs() < 1e-9);
        assert!(report.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_adaptation_rate_counts_strict_improvements() {
        let classifier = Arc::new(ScriptedClassifier::constant(CommandType::App, 0.9));
        let mut monitor = AdaptiveLearningMonitor::new(classifier, LearningConfig::default());
        let memory = memory();

        // accuracies 0, 1, 1, 0, 1: two strict increases out of four steps
        for success in [false, true, true, false, true] {
            let feedback = Feedback { success };
            monitor.record_interaction(&memory, "launch", &ok(), Some(&feedback)).await.unwrap();
        }

        let report = monitor.performance_report();
        assert!((report.adaptation_rate - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_drift_score_on_first_sample_uses_current_confidence() {
        let classifier = Arc::new(ScriptedClassifier::constant(CommandType::System, 0.6));
        let mut monitor = AdaptiveLearningMonitor::new(classifier, LearningConfig::default());

        let outcome = monitor.record_interaction(&memory(), "volume up", &ok(), None).await.unwrap();
        assert!((outcome.metrics.drift_score - 0.4 * 0.4).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_no_drift_before_two_windows() {
        let classifier = Arc::new(ScriptedClassifier::constant(CommandType::File, 0.9));
        let mut monitor = AdaptiveLearningMonitor::new(classifier, LearningConfig::default());
        let memory = memory();

        for _ in 0..50 {
            monitor
                .record_interaction(&memory, "open", &ok(), Some(&Feedback::failure()))
                .await
                .unwrap();
        }
        let drift = monitor.detect_concept_drift();
        assert!(!drift.detected);
        assert_eq!(drift.severity, 0.0);
    }

    #[tokio::test]
    async fn test_drift_detected_and_fine_tune_applied() {
        let classifier = Arc::new(ScriptedClassifier::constant(CommandType::File, 0.9));
        let calls = classifier.calls.clone();
        let mut monitor = AdaptiveLearningMonitor::new(classifier, LearningConfig::default());

        let mut memory = memory();
        memory
            .add_turn("open report", "done", TurnMetadata::succeeded(CommandType::File, 0.9, "open_file"))
            .await
            .unwrap();
        memory
            .add_turn("search rust", "done", TurnMetadata::succeeded(CommandType::Web, 0.9, "search"))
            .await
            .unwrap();

        for _ in 0..50 {
            let outcome = monitor
                .record_interaction(&memory, "open", &ok(), Some(&Feedback::success()))
                .await
                .unwrap();
            assert!(outcome.adaptation.is_none());
        }

        // The 51st failing sample shifts recent mean accuracy by 1/50 only
        let outcome = monitor
            .record_interaction(&memory, "open", &ok(), Some(&Feedback::failure()))
            .await
            .unwrap();
        assert!(!outcome.drift.detected);

        for _ in 0..10 {
            monitor
                .record_interaction(&memory, "open", &ok(), Some(&Feedback::failure()))
                .await
                .unwrap();
        }

        let drift = monitor.detect_concept_drift();
        assert!(drift.detected);
        assert!((drift.severity - 11.0 / 50.0).abs() < 1e-9);
        assert_eq!(drift.affected_concepts, vec![CommandType::File]);

        let strategy = monitor.select_strategy(&drift);
        assert_eq!(strategy.kind, AdaptationKind::FineTune);
        assert_eq!(strategy.priority, 3);

        let calls = calls.lock().await;
        assert!(!calls.update.is_empty());
        // only the FILE turn matches the affected concept
        assert!(calls.update.iter().all(|n| *n == 1));
        assert!(calls.train.is_empty());
    }

    #[tokio::test]
    async fn test_strategy_selection_thresholds() {
        let classifier = Arc::new(ScriptedClassifier::constant(CommandType::File, 0.9));
        let monitor = AdaptiveLearningMonitor::new(classifier, LearningConfig::default());
        let drift = |severity| ConceptDrift {
            detected: true,
            severity,
            affected_concepts: vec![CommandType::Web],
            timestamp: Utc::now(),
        };

        let retrain = monitor.select_strategy(&drift(0.6));
        assert_eq!(retrain.kind, AdaptationKind::Retrain);
        assert_eq!(retrain.priority, 1);
        assert_eq!(retrain.affected_components.len(), 2);

        let urgent = monitor.select_strategy(&drift(0.4));
        assert_eq!((urgent.kind, urgent.priority), (AdaptationKind::FineTune, 2));

        let mild = monitor.select_strategy(&drift(0.2));
        assert_eq!((mild.kind, mild.priority), (AdaptationKind::FineTune, 3));
        assert_eq!(mild.affected_concepts, vec![CommandType::Web]);
    }

    #[tokio::test]
    async fn test_retrain_and_reset_reach_classifier() {
        let classifier = Arc::new(ScriptedClassifier::constant(CommandType::File, 0.9));
        let calls = classifier.calls.clone();
        let monitor = AdaptiveLearningMonitor::new(classifier, LearningConfig::default());
        let mut memory = memory();
        memory
            .add_turn("open report", "done", TurnMetadata::succeeded(CommandType::File, 0.9, "open_file"))
            .await
            .unwrap();
        memory
            .add_turn("bad", "no", TurnMetadata::failed(Some(CommandType::App), "crash"))
            .await
            .unwrap();

        let retrain = AdaptationStrategy {
            kind: AdaptationKind::Retrain,
            priority: 1,
            affected_components: vec![AdaptiveComponent::IntentClassifier],
            affected_concepts: vec![],
        };
        assert_eq!(monitor.apply_strategy(&memory, &retrain).await.unwrap(), 1);

        let reset = AdaptationStrategy {
            kind: AdaptationKind::Reset,
            priority: 1,
            affected_components: vec![AdaptiveComponent::IntentClassifier, AdaptiveComponent::ReasoningPipeline],
            affected_concepts: vec![],
        };
        assert_eq!(monitor.apply_strategy(&memory, &reset).await.unwrap(), 0);

        let calls = calls.lock().await;
        assert_eq!(calls.train, vec![1]);
        assert_eq!(calls.initialize, 1);
    }

    #[tokio::test]
    async fn test_meta_learning_rescales_rate_on_poor_accuracy() {
        let classifier = Arc::new(ScriptedClassifier::constant(CommandType::File, 0.9));
        let calls = classifier.calls.clone();
        let mut monitor = AdaptiveLearningMonitor::new(classifier, LearningConfig::default());
        let memory = memory();

        let outcome = monitor
            .record_interaction(&memory, "open", &ok(), Some(&Feedback::failure()))
            .await
            .unwrap();

        // single sample: adaptation rate 0.1
        let expected = 0.001 * 1.1;
        assert!((outcome.learning_rate.unwrap() - expected).abs() < 1e-12);
        assert!((monitor.learning_rate() - expected).abs() < 1e-12);
        assert_eq!(calls.lock().await.learning_rates.len(), 1);

        let fine = monitor.record_interaction(&memory, "open", &ok(), None).await.unwrap();
        assert!(fine.learning_rate.is_none());
    }

    #[tokio::test]
    async fn test_window_is_capped() {
        let classifier = Arc::new(ScriptedClassifier::constant(CommandType::File, 0.9));
        let config = LearningConfig {
            history_window: 4,
            drift_window: 2,
            ..Default::default()
        };
        let mut monitor = AdaptiveLearningMonitor::new(classifier, config);
        let memory = memory();
        for _ in 0..7 {
            monitor.record_interaction(&memory, "open", &ok(), None).await.unwrap();
        }
        assert_eq!(monitor.len(), 4);
    }

    #[tokio::test]
    async fn test_report_on_empty_window() {
        let classifier = Arc::new(ScriptedClassifier::constant(CommandType::File, 0.9));
        let monitor = AdaptiveLearningMonitor::new(classifier, LearningConfig::default());

        let report = monitor.performance_report();
        assert_eq!(report.overall_accuracy, 0.0);
        assert!(!report.drift_status.detected);
        assert_eq!(report.adaptation_rate, 0.1);
        assert_eq!(report.recommendations, vec!["Consider collecting more training data".to_string()]);
    }

    #[tokio::test]
    async fn test_scripted_confidence_drives_volatility() {
        let script = vec![
            IntentPrediction { command_type: CommandType::Web, confidence: 0.5 },
            IntentPrediction { command_type: CommandType::Web, confidence: 0.9 },
            IntentPrediction { command_type: CommandType::Web, confidence: 0.5 },
        ];
        let classifier = Arc::new(ScriptedClassifier::scripted(script));
        let mut monitor = AdaptiveLearningMonitor::new(classifier, LearningConfig::default());
        let memory = memory();

        monitor.record_interaction(&memory, "a", &ok(), None).await.unwrap();
        monitor.record_interaction(&memory, "b", &ok(), None).await.unwrap();
        let third = monitor.record_interaction(&memory, "c", &ok(), None).await.unwrap();

        // prior confidences [0.5, 0.9]: mean 0.7, volatility 0.4
        let expected = (1.0 - 0.7) * 0.4 + 0.4 * 0.3;
        assert!((third.metrics.drift_score - expected).abs() < 1e-9);
    }
}
