// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Decision Maker
//!
//! Runs the reasoning pipeline, annotates the result with an uncertainty
//! estimate and fallback alternatives, and executes the chosen action.
//! Uncertain decisions are passed through every proposed mitigation before
//! execution. Every execution, failed or not, is reported to the learning
//! monitor.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Decision and execution stages of the feedback loop

use chrono::Utc;
use sentio_cortex::application::{AdaptiveLearningMonitor, MemoryStore};
use sentio_cortex::domain::{Feedback, InteractionResult};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::application::reasoning_pipeline::ReasoningPipeline;
use crate::application::uncertainty::UncertaintyEstimator;
use crate::domain::agent_config::DecisionConfig;
use crate::domain::decision::{
    Alternative, Decision, DecisionId, ExecutionMetrics, ExecutionResult, MitigationStrategy,
    Tradeoffs, UncertaintyEstimate,
};
use crate::domain::error::PipelineError;
use crate::domain::events::DecisionEvent;
use crate::domain::executor::CommandExecutor;
use crate::domain::reasoning::{ActionParameters, ReasoningResult};
use crate::infrastructure::event_bus::EventBus;

pub struct DecisionMaker {
    pipeline: ReasoningPipeline,
    estimator: UncertaintyEstimator,
    executor: Arc<dyn CommandExecutor>,
    event_bus: EventBus,
    config: DecisionConfig,
}

impl DecisionMaker {
    pub fn new(
        pipeline: ReasoningPipeline,
        estimator: UncertaintyEstimator,
        executor: Arc<dyn CommandExecutor>,
        event_bus: EventBus,
        config: DecisionConfig,
    ) -> Self {
        Self {
            pipeline,
            estimator,
            executor,
            event_bus,
            config,
        }
    }

    pub fn pipeline(&self) -> &ReasoningPipeline {
        &self.pipeline
    }

    pub async fn make_decision(
        &self,
        memory: &MemoryStore,
        monitor: &AdaptiveLearningMonitor,
        input: &str,
    ) -> Result<Decision, PipelineError> {
        let result = self.pipeline.process(memory, input).await?;
        let report = monitor.performance_report();
        let uncertainty = self.estimator.estimate(&result, &report);

        let step = result.first_step().ok_or(PipelineError::EmptyPlan)?;
        let action = step.action.clone();
        let mut parameters = step.parameters.clone();
        parameters.timeout_ms.get_or_insert(self.config.default_timeout_ms);
        parameters.retries.get_or_insert(self.config.default_retries);

        let alternatives = if uncertainty.total > self.config.max_uncertainty {
            self.generate_alternatives(memory, &result, &action, &parameters)
                .await?
        } else {
            Vec::new()
        };

        let explanation = self.explain(&result, &uncertainty);

        let decision = Decision {
            id: DecisionId::new(),
            input: input.to_string(),
            action,
            parameters,
            confidence: result.confidence,
            uncertainty,
            explanation,
            alternatives,
            timestamp: Utc::now(),
        };

        info!(
            decision_id = %decision.id,
            action = %decision.action,
            confidence = decision.confidence,
            uncertainty = decision.uncertainty.total,
            alternatives = decision.alternatives.len(),
            "Decision made"
        );
        metrics::counter!("sentio_decisions_total").increment(1);
        metrics::histogram!("sentio_decision_uncertainty").record(decision.uncertainty.total);

        self.event_bus.publish_decision_event(DecisionEvent::DecisionMade {
            decision_id: decision.id,
            action: decision.action.clone(),
            confidence: decision.confidence,
            uncertainty: decision.uncertainty.total,
            alternatives: decision.alternatives.len(),
            made_at: decision.timestamp,
        });

        Ok(decision)
    }

    /// Mitigate (when too uncertain), execute and report to the monitor.
    ///
    /// Failures in any stage end up in the returned [`ExecutionResult`]. A
    /// failed mitigation skips execution; a failed learning update keeps the
    /// executor outcome and sets `learning_error`.
    pub async fn execute_decision(
        &self,
        memory: &MemoryStore,
        monitor: &mut AdaptiveLearningMonitor,
        decision: &Decision,
    ) -> Result<ExecutionResult, PipelineError> {
        let started = Instant::now();
        let mut parameters = decision.parameters.clone();
        let mut applied_mitigations = Vec::new();

        let mut mitigation_error = None;

        if decision.uncertainty.total > self.config.max_uncertainty {
            for strategy in &decision.uncertainty.mitigation_strategies {
                if let Err(e) = self
                    .apply_mitigation(memory, decision, *strategy, &mut parameters)
                    .await
                {
                    warn!(decision_id = %decision.id, strategy = ?strategy, error = %e, "Mitigation failed");
                    mitigation_error = Some(format!("Mitigation {strategy:?} failed: {e}"));
                    break;
                }
                applied_mitigations.push(*strategy);
                self.event_bus.publish_decision_event(DecisionEvent::MitigationApplied {
                    decision_id: decision.id,
                    strategy: *strategy,
                    applied_at: Utc::now(),
                });
            }
        }

        // A decision that could not be mitigated is never executed
        let (success, output, error) = match mitigation_error {
            Some(error) => (false, None, Some(error)),
            None => match self.executor.execute(&decision.action, &parameters).await {
                Ok(outcome) => (outcome.success, outcome.output, outcome.error),
                Err(e) => {
                    warn!(decision_id = %decision.id, action = %decision.action, error = %e, "Executor failed");
                    (false, None, Some(e.to_string()))
                }
            },
        };
        let execution_time_ms = started.elapsed().as_millis() as u64;

        let interaction = InteractionResult {
            success,
            action: Some(decision.action.clone()),
            error: error.clone(),
        };
        let previous_rate = monitor.learning_rate();
        let learning_error = match monitor
            .record_interaction(memory, &decision.input, &interaction, Some(&Feedback { success }))
            .await
        {
            Ok(outcome) => {
                self.event_bus.publish_interaction_outcome(&outcome, previous_rate);
                None
            }
            Err(e) => {
                warn!(decision_id = %decision.id, error = %e, "Failed to record interaction");
                Some(e.to_string())
            }
        };

        if success {
            info!(
                decision_id = %decision.id,
                action = %decision.action,
                execution_time_ms,
                mitigations = applied_mitigations.len(),
                "Decision executed"
            );
            self.event_bus.publish_decision_event(DecisionEvent::DecisionExecuted {
                decision_id: decision.id,
                action: decision.action.clone(),
                execution_time_ms,
                executed_at: Utc::now(),
            });
        } else {
            warn!(
                decision_id = %decision.id,
                action = %decision.action,
                error = error.as_deref().unwrap_or("unknown"),
                "Decision execution failed"
            );
            self.event_bus.publish_decision_event(DecisionEvent::DecisionFailed {
                decision_id: decision.id,
                action: decision.action.clone(),
                error: error.clone().unwrap_or_default(),
                failed_at: Utc::now(),
            });
        }
        metrics::counter!(
            "sentio_executions_total",
            "outcome" => if success { "success" } else { "failure" }
        )
        .increment(1);

        Ok(ExecutionResult {
            decision_id: decision.id,
            action: decision.action.clone(),
            parameters,
            applied_mitigations,
            success,
            output,
            error,
            learning_error,
            metrics: ExecutionMetrics {
                execution_time_ms,
                resource_usage: memory.system_state().resource_usage,
            },
        })
    }

    async fn apply_mitigation(
        &self,
        memory: &MemoryStore,
        decision: &Decision,
        strategy: MitigationStrategy,
        parameters: &mut ActionParameters,
    ) -> Result<(), PipelineError> {
        match strategy {
            MitigationStrategy::ConservativeParameters => {
                parameters.safe_mode = true;
                let timeout = parameters.timeout_ms.unwrap_or(self.config.default_timeout_ms);
                parameters.timeout_ms = Some(timeout.saturating_mul(self.config.conservative_timeout_factor));
                let retries = parameters.retries.unwrap_or(self.config.default_retries);
                parameters.retries = Some(retries.saturating_add(1));
            }
            MitigationStrategy::RequestConfirmation => {
                parameters.require_confirmation = true;
                parameters.validation_checks = true;
            }
            MitigationStrategy::RefreshContext => {
                parameters.context = Some(memory.summarize(&decision.explanation).await?);
            }
            MitigationStrategy::CollectTrainingData | MitigationStrategy::ConsiderRecentChanges => {}
        }
        debug!(decision_id = %decision.id, strategy = ?strategy, "Applied mitigation");
        Ok(())
    }

    async fn generate_alternatives(
        &self,
        memory: &MemoryStore,
        result: &ReasoningResult,
        action: &str,
        parameters: &ActionParameters,
    ) -> Result<Vec<Alternative>, PipelineError> {
        let mut alternatives = Vec::with_capacity(2);

        let summary = memory.summarize(&result.final_hypothesis.description).await?;
        let precedent = summary
            .relevant_history
            .iter()
            .filter(|turn| turn.metadata.is_successful())
            .max_by_key(|turn| turn.timestamp);
        if let Some(turn) = precedent {
            alternatives.push(Alternative {
                action: turn
                    .metadata
                    .executed_commands
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "fallback".to_string()),
                parameters: ActionParameters {
                    intent: Some(turn.input.clone()),
                    command_type: turn.metadata.intent,
                    timeout_ms: parameters.timeout_ms,
                    retries: parameters.retries,
                    precedent: Some(turn.metadata.clone()),
                    ..Default::default()
                },
                confidence: result.confidence * self.config.historical_discount,
                tradeoffs: Tradeoffs {
                    advantages: vec!["Proven successful in similar context".to_string()],
                    disadvantages: vec!["May not fully address current requirements".to_string()],
                },
            });
        }

        alternatives.push(Alternative {
            action: format!("safe_{action}"),
            parameters: ActionParameters {
                safe_mode: true,
                ..parameters.clone()
            },
            confidence: result.confidence * self.config.safe_discount,
            tradeoffs: Tradeoffs {
                advantages: vec!["Lower risk".to_string(), "Guaranteed safety checks".to_string()],
                disadvantages: vec!["Slower execution".to_string(), "Limited functionality".to_string()],
            },
        });

        Ok(alternatives)
    }

    fn explain(&self, result: &ReasoningResult, uncertainty: &UncertaintyEstimate) -> String {
        let steps = result
            .steps
            .iter()
            .map(|step| format!("- {}: {:.2} confidence", step.kind, step.confidence))
            .collect::<Vec<_>>()
            .join("\n");

        let mut explanation = format!(
            "Decision based on {} reasoning steps:\n{}\n\nUncertainty Analysis:\n- Model uncertainty: {:.2}\n- Data uncertainty: {:.2}\n- Context uncertainty: {:.2}",
            result.steps.len(),
            steps,
            uncertainty.sources.model,
            uncertainty.sources.data,
            uncertainty.sources.context,
        );

        if uncertainty.total > self.config.max_uncertainty {
            explanation.push_str("\n\nMitigation Strategies:");
            for strategy in &uncertainty.mitigation_strategies {
                explanation.push_str("\n- ");
                explanation.push_str(strategy.description());
            }
        }

        explanation
    }
}
