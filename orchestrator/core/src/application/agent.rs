// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Agent
//!
//! Owns one agent's memory, learning monitor and decision maker, and exposes
//! the operations of the feedback loop. State changes go through `&mut self`;
//! share an agent between tasks with [`crate::application::session`].
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Facade over the perception → reasoning → decision → learning loop

use chrono::{DateTime, Utc};
use sentio_cortex::application::{AdaptiveLearningMonitor, MemoryStore};
use sentio_cortex::domain::{
    BehaviorAnalysis, CortexEvent, Feedback, IntentClassifier, InteractionOutcome,
    InteractionResult, PerformanceReport, SystemStateUpdate, TextEncoder, TurnId, TurnMetadata,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::application::decision_maker::DecisionMaker;
use crate::application::reasoning_pipeline::ReasoningPipeline;
use crate::application::uncertainty::UncertaintyEstimator;
use crate::domain::agent_config::AgentConfigSpec;
use crate::domain::decision::{Decision, ExecutionResult};
use crate::domain::error::PipelineError;
use crate::domain::executor::CommandExecutor;
use crate::domain::reasoning::ReasoningResult;
use crate::infrastructure::event_bus::EventBus;

/// Action the pipeline plans when it needs the user to rephrase.
pub const CLARIFY_ACTION: &str = "clarify";

/// Everything one handled request produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub decision: Decision,
    /// Absent when the agent asked for clarification instead of acting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<ExecutionResult>,
    /// Text stored as the turn's response
    pub response: String,
    pub turn_id: TurnId,
}

pub struct Agent {
    memory: MemoryStore,
    monitor: AdaptiveLearningMonitor,
    decision_maker: DecisionMaker,
    event_bus: EventBus,
}

impl Agent {
    pub fn new(
        spec: &AgentConfigSpec,
        classifier: Arc<dyn IntentClassifier>,
        encoder: Arc<dyn TextEncoder>,
        executor: Arc<dyn CommandExecutor>,
        event_bus: EventBus,
    ) -> Self {
        let pipeline = ReasoningPipeline::new(classifier.clone(), spec.reasoning.clone());
        let estimator = UncertaintyEstimator::new(spec.uncertainty.clone());
        let decision_maker = DecisionMaker::new(
            pipeline,
            estimator,
            executor,
            event_bus.clone(),
            spec.decision.clone(),
        );

        Self {
            memory: MemoryStore::new(encoder, spec.memory.clone()),
            monitor: AdaptiveLearningMonitor::new(classifier, spec.learning.clone()),
            decision_maker,
            event_bus,
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn monitor(&self) -> &AdaptiveLearningMonitor {
        &self.monitor
    }

    /// Decide, act and remember: one full pass of the loop.
    pub async fn handle(&mut self, input: &str) -> Result<AgentResponse, PipelineError> {
        let decision = self.make_decision(input).await?;
        let intent = decision.parameters.command_type;

        let (execution, response, metadata) = if decision.action == CLARIFY_ACTION {
            let metadata = TurnMetadata {
                intent,
                confidence: Some(decision.confidence.clamp(0.0, 1.0)),
                ..Default::default()
            };
            (
                None,
                "Could you clarify what you would like me to do?".to_string(),
                metadata,
            )
        } else {
            let execution = self.execute_decision(&decision).await?;
            let (response, metadata) = if execution.success {
                let response = execution
                    .output
                    .as_ref()
                    .map(|output| output.to_string())
                    .unwrap_or_else(|| format!("Executed {}", execution.action));
                let metadata = TurnMetadata {
                    intent,
                    confidence: Some(decision.confidence.clamp(0.0, 1.0)),
                    executed_commands: vec![execution.action.clone()],
                    success: Some(true),
                    error: None,
                };
                (response, metadata)
            } else {
                let error = execution.error.clone().unwrap_or_else(|| "unknown error".to_string());
                (
                    format!("Failed to {}: {}", execution.action, error),
                    TurnMetadata::failed(intent, error),
                )
            };
            (Some(execution), response, metadata)
        };

        let turn_id = self.add_turn(input, &response, metadata).await?;

        Ok(AgentResponse {
            decision,
            execution,
            response,
            turn_id,
        })
    }

    pub async fn process(&self, input: &str) -> Result<ReasoningResult, PipelineError> {
        self.decision_maker.pipeline().process(&self.memory, input).await
    }

    pub async fn make_decision(&self, input: &str) -> Result<Decision, PipelineError> {
        self.decision_maker
            .make_decision(&self.memory, &self.monitor, input)
            .await
    }

    pub async fn execute_decision(&mut self, decision: &Decision) -> Result<ExecutionResult, PipelineError> {
        self.decision_maker
            .execute_decision(&self.memory, &mut self.monitor, decision)
            .await
    }

    pub async fn record_interaction(
        &mut self,
        input: &str,
        result: &InteractionResult,
        feedback: Option<Feedback>,
    ) -> Result<InteractionOutcome, PipelineError> {
        let previous_rate = self.monitor.learning_rate();
        let outcome = self
            .monitor
            .record_interaction(&self.memory, input, result, feedback.as_ref())
            .await?;
        self.event_bus.publish_interaction_outcome(&outcome, previous_rate);
        Ok(outcome)
    }

    pub fn performance_report(&self) -> PerformanceReport {
        self.monitor.performance_report()
    }

    pub async fn add_turn(
        &mut self,
        input: &str,
        response: &str,
        metadata: TurnMetadata,
    ) -> Result<TurnId, PipelineError> {
        let intent = metadata.intent;
        let turn_id = self.memory.add_turn(input, response, metadata).await?;
        self.event_bus.publish_learning_event(CortexEvent::TurnRecorded {
            turn_id,
            intent,
            history_len: self.memory.len(),
            timestamp: Utc::now(),
        });
        Ok(turn_id)
    }

    pub fn upsert_preference(&mut self, category: &str, value: serde_json::Value, confidence: f64) {
        self.memory.upsert_preference(category, value, confidence);
    }

    pub fn update_system_state(&mut self, update: SystemStateUpdate) {
        self.memory.update_system_state(update);
    }

    pub fn analyze_behavior(&self) -> BehaviorAnalysis {
        self.memory.analyze_behavior()
    }

    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let removed = self.memory.purge_expired(now);
        if removed > 0 {
            let retention_days = self.memory.config().retention_days;
            info!(removed, retention_days, "Expired turns purged");
            self.event_bus.publish_learning_event(CortexEvent::TurnsPurged {
                removed,
                retention_days,
                timestamp: now,
            });
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::dry_run_executor::DryRunExecutor;
    use crate::infrastructure::event_bus::DomainEvent;
    use chrono::Duration;
    use sentio_cortex::domain::CommandType;
    use sentio_cortex::infrastructure::{KeywordIntentClassifier, VocabularyEncoder};

    fn agent(executor: Arc<DryRunExecutor>) -> Agent {
        Agent::new(
            &AgentConfigSpec::default(),
            Arc::new(KeywordIntentClassifier::new()),
            Arc::new(VocabularyEncoder::new(64)),
            executor,
            EventBus::new(256),
        )
    }

    #[tokio::test]
    async fn test_handle_executes_and_remembers() {
        let executor = Arc::new(DryRunExecutor::new());
        let mut agent = agent(executor.clone());

        let response = agent.handle("open file /tmp/report.txt").await.unwrap();

        assert_eq!(response.decision.parameters.command_type, Some(CommandType::File));
        let execution = response.execution.expect("confident request is executed");
        assert!(execution.success);
        assert_eq!(executor.recorded().len(), 1);

        assert_eq!(agent.memory().len(), 1);
        let turn = agent.memory().history().next().unwrap();
        assert_eq!(turn.id, response.turn_id);
        assert_eq!(turn.metadata.success, Some(true));
        assert_eq!(turn.metadata.intent, Some(CommandType::File));
        assert_eq!(turn.metadata.executed_commands, vec![execution.action]);

        assert_eq!(agent.monitor().len(), 1);
    }

    #[tokio::test]
    async fn test_handle_clarifies_without_executing() {
        let executor = Arc::new(DryRunExecutor::new());
        let mut agent = agent(executor.clone());

        // No lexicon words: the classifier falls back to an even split
        let response = agent.handle("zzz qqq").await.unwrap();

        assert_eq!(response.decision.action, CLARIFY_ACTION);
        assert!(response.execution.is_none());
        assert!(executor.recorded().is_empty());
        assert_eq!(agent.monitor().len(), 0);

        let turn = agent.memory().history().next().unwrap();
        assert_eq!(turn.metadata.success, None);
    }

    #[tokio::test]
    async fn test_memory_operations_publish_events() {
        let mut agent = agent(Arc::new(DryRunExecutor::new()));
        let mut events = agent.event_bus().subscribe();

        let now = Utc::now();
        agent
            .memory
            .add_turn_at("old request", "ok", TurnMetadata::default(), now - Duration::days(8))
            .await
            .unwrap();
        agent
            .add_turn("new request", "ok", TurnMetadata::default())
            .await
            .unwrap();

        assert_eq!(agent.purge_expired(now), 1);
        assert_eq!(agent.memory().len(), 1);
        // Nothing left to purge, nothing published
        assert_eq!(agent.purge_expired(now), 0);

        let mut types = Vec::new();
        while let Ok(DomainEvent::Learning(event)) = events.try_recv() {
            types.push(event.event_type());
        }
        assert_eq!(types, vec!["turn_recorded", "turns_purged"]);
    }

    #[tokio::test]
    async fn test_record_interaction_without_feedback_is_self_reported() {
        let mut agent = agent(Arc::new(DryRunExecutor::new()));
        let outcome = agent
            .record_interaction("open file notes", &InteractionResult::default(), None)
            .await
            .unwrap();

        assert_eq!(
            outcome.metrics.accuracy_source,
            sentio_cortex::domain::AccuracySource::SelfReported
        );
        assert_eq!(agent.performance_report().overall_accuracy, outcome.metrics.accuracy);
    }
}
