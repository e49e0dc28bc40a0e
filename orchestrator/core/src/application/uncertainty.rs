// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Splits the confidence gap of a reasoning result into model, data and
//! context uncertainty and proposes mitigations for each source that is too
//! high.

use chrono::{DateTime, Utc};
use sentio_cortex::domain::PerformanceReport;
use tracing::debug;

use crate::domain::agent_config::UncertaintyConfig;
use crate::domain::decision::{MitigationStrategy, UncertaintyEstimate, UncertaintySources};
use crate::domain::reasoning::{ReasoningResult, StepKind};

pub struct UncertaintyEstimator {
    config: UncertaintyConfig,
}

impl UncertaintyEstimator {
    pub fn new(config: UncertaintyConfig) -> Self {
        Self { config }
    }

    pub fn estimate(&self, result: &ReasoningResult, report: &PerformanceReport) -> UncertaintyEstimate {
        self.estimate_at(result, report, Utc::now())
    }

    /// Recency of relevant history is measured against `now`.
    pub fn estimate_at(
        &self,
        result: &ReasoningResult,
        report: &PerformanceReport,
        now: DateTime<Utc>,
    ) -> UncertaintyEstimate {
        let sources = UncertaintySources {
            model: (1.0 - report.overall_accuracy).clamp(0.0, 1.0),
            data: self.data_uncertainty(result),
            context: self.context_uncertainty(result, now),
        };

        let total = (self.config.model_weight * sources.model
            + self.config.data_weight * sources.data
            + self.config.context_weight * sources.context)
            .clamp(0.0, 1.0);

        let threshold = self.config.mitigation_threshold;
        let mut mitigation_strategies = Vec::new();
        if sources.model > threshold {
            mitigation_strategies.push(MitigationStrategy::CollectTrainingData);
        }
        if sources.data > threshold {
            mitigation_strategies.push(MitigationStrategy::RequestConfirmation);
            mitigation_strategies.push(MitigationStrategy::ConservativeParameters);
        }
        if sources.context > threshold {
            mitigation_strategies.push(MitigationStrategy::RefreshContext);
            mitigation_strategies.push(MitigationStrategy::ConsiderRecentChanges);
        }

        debug!(
            total,
            model = sources.model,
            data = sources.data,
            context = sources.context,
            mitigations = mitigation_strategies.len(),
            "Estimated uncertainty"
        );

        UncertaintyEstimate {
            total,
            sources,
            mitigation_strategies,
        }
    }

    fn data_uncertainty(&self, result: &ReasoningResult) -> f64 {
        let supporting = result.final_hypothesis.supporting_evidence.len() as f64;
        let counter = result.final_hypothesis.counter_evidence.len() as f64;
        let evidence_strength = if supporting + counter > 0.0 {
            supporting / (supporting + counter)
        } else {
            0.0
        };

        // empty product is 1
        let evidence_confidence: f64 = result
            .steps
            .iter()
            .filter(|step| step.kind == StepKind::Validation)
            .map(|step| step.confidence)
            .product();

        let weight = self.config.evidence_strength_weight;
        (1.0 - (evidence_strength * weight + evidence_confidence * (1.0 - weight))).clamp(0.0, 1.0)
    }

    fn context_uncertainty(&self, result: &ReasoningResult, now: DateTime<Utc>) -> f64 {
        let Some(step) = result.step(StepKind::Context) else {
            return 1.0;
        };

        let recency = result
            .context()
            .and_then(|context| context.newest_turn())
            .map(|newest| {
                let age_hours = (now - newest).num_milliseconds() as f64 / 3_600_000.0;
                (1.0 - age_hours / self.config.recency_horizon_hours).max(0.0)
            })
            .unwrap_or(0.0);

        let weight = self.config.context_relevance_weight;
        (1.0 - (step.confidence * weight + recency.min(1.0) * (1.0 - weight))).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reasoning::{
        ActionPlan, ContextAnalysis, Hypothesis, ReasoningStep, StepInput, StepOutput,
        Understanding, ValidationOutcome,
    };
    use chrono::Duration;
    use sentio_cortex::domain::{
        CommandType, ConceptDrift, ConversationTurn, SystemState, TurnId, TurnMetadata,
    };

    fn report(accuracy: f64) -> PerformanceReport {
        PerformanceReport {
            overall_accuracy: accuracy,
            drift_status: ConceptDrift::none(),
            adaptation_rate: 0.1,
            recommendations: Vec::new(),
        }
    }

    fn understanding() -> Understanding {
        Understanding {
            intent: CommandType::File,
            confidence: 0.9,
            entities: Default::default(),
        }
    }

    fn turn(timestamp: DateTime<Utc>) -> ConversationTurn {
        ConversationTurn {
            id: TurnId::new(),
            timestamp,
            input: "open notes".to_string(),
            response: "ok".to_string(),
            embedding: Vec::new(),
            metadata: TurnMetadata::default(),
        }
    }

    fn result_with(
        hypothesis: Hypothesis,
        context: Option<(f64, Vec<ConversationTurn>)>,
        validation_confidence: Option<f64>,
    ) -> ReasoningResult {
        let mut steps = vec![ReasoningStep::new(
            StepKind::Understanding,
            StepInput::Understanding { text: "x".to_string() },
            StepOutput::Understanding(understanding()),
            0.9,
        )];
        if let Some((confidence, relevant_history)) = context {
            steps.push(ReasoningStep::new(
                StepKind::Context,
                StepInput::Context {
                    text: "x".to_string(),
                    understanding: understanding(),
                },
                StepOutput::Context(ContextAnalysis {
                    relevant_history,
                    preferences: Vec::new(),
                    system_state: SystemState::default(),
                }),
                confidence,
            ));
        }
        if let Some(confidence) = validation_confidence {
            steps.push(ReasoningStep::new(
                StepKind::Validation,
                StepInput::Validation {
                    hypothesis: hypothesis.clone(),
                },
                StepOutput::Validation(ValidationOutcome {
                    is_valid: true,
                    constraints_satisfied: true,
                    risks_acceptable: true,
                    resources_available: true,
                }),
                confidence,
            ));
        }
        ReasoningResult {
            steps,
            final_hypothesis: hypothesis,
            action_plan: ActionPlan {
                steps: Vec::new(),
                estimated_success: 0.9,
                potential_risks: Vec::new(),
            },
            confidence: 0.9,
            explanation: String::new(),
        }
    }

    #[test]
    fn test_total_is_weighted_sum_of_sources() {
        let estimator = UncertaintyEstimator::new(UncertaintyConfig::default());
        let now = Utc::now();
        let mut hypothesis = Hypothesis::new("h", 0.9);
        hypothesis.supporting_evidence = vec!["a".into(), "b".into(), "c".into()];
        hypothesis.counter_evidence = vec!["d".into()];

        let result = result_with(hypothesis, Some((0.7, vec![turn(now - Duration::hours(6))])), Some(0.8));
        let estimate = estimator.estimate_at(&result, &report(0.9), now);

        let s = estimate.sources;
        assert!((s.model - 0.1).abs() < 1e-9);
        // 1 - (0.75 * 0.6 + 0.8 * 0.4)
        assert!((s.data - 0.23).abs() < 1e-9);
        // 1 - (0.7 * 0.7 + 0.75 * 0.3)
        assert!((s.context - 0.285).abs() < 1e-9);
        let expected = 0.4 * s.model + 0.3 * s.data + 0.3 * s.context;
        assert!((estimate.total - expected).abs() < 1e-12);
        assert!(estimate.mitigation_strategies.is_empty());
    }

    #[test]
    fn test_empty_report_and_missing_stages_are_fully_uncertain() {
        let estimator = UncertaintyEstimator::new(UncertaintyConfig::default());
        let mut hypothesis = Hypothesis::new("Insufficient confidence in understanding", 0.6);
        hypothesis.counter_evidence.push("Low confidence: 0.6".into());

        let estimate = estimator.estimate(&result_with(hypothesis, None, None), &report(0.0));

        assert_eq!(estimate.sources.model, 1.0);
        // no validation step: evidence confidence 1, strength 0
        assert!((estimate.sources.data - 0.6).abs() < 1e-9);
        assert_eq!(estimate.sources.context, 1.0);
        assert!((estimate.total - 0.88).abs() < 1e-9);
        assert_eq!(
            estimate.mitigation_strategies,
            vec![
                MitigationStrategy::CollectTrainingData,
                MitigationStrategy::RequestConfirmation,
                MitigationStrategy::ConservativeParameters,
                MitigationStrategy::RefreshContext,
                MitigationStrategy::ConsiderRecentChanges,
            ]
        );
    }

    #[test]
    fn test_no_evidence_counts_as_zero_strength() {
        let estimator = UncertaintyEstimator::new(UncertaintyConfig::default());
        let result = result_with(Hypothesis::new("h", 0.9), Some((1.0, Vec::new())), Some(1.0));
        let estimate = estimator.estimate(&result, &report(1.0));

        assert!((estimate.sources.data - 0.6).abs() < 1e-9);
        // no history means no recency
        assert!((estimate.sources.context - 0.3).abs() < 1e-9);
        assert_eq!(
            &estimate.mitigation_strategies[..2],
            &[
                MitigationStrategy::RequestConfirmation,
                MitigationStrategy::ConservativeParameters,
            ]
        );
        assert!(!estimate
            .mitigation_strategies
            .contains(&MitigationStrategy::CollectTrainingData));
    }

    #[test]
    fn test_stale_history_has_no_recency() {
        let estimator = UncertaintyEstimator::new(UncertaintyConfig::default());
        let now = Utc::now();
        let mut hypothesis = Hypothesis::new("h", 0.9);
        hypothesis.supporting_evidence.push("a".into());

        let stale = result_with(hypothesis.clone(), Some((1.0, vec![turn(now - Duration::hours(48))])), Some(1.0));
        let fresh = result_with(hypothesis, Some((1.0, vec![turn(now)])), Some(1.0));

        let stale_estimate = estimator.estimate_at(&stale, &report(1.0), now);
        let fresh_estimate = estimator.estimate_at(&fresh, &report(1.0), now);

        assert!((stale_estimate.sources.context - 0.3).abs() < 1e-9);
        assert!(fresh_estimate.sources.context.abs() < 1e-9);
        assert!(fresh_estimate.total.abs() < 1e-9);
    }
}
