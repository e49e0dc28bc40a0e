// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Reasoning Pipeline
//!
//! Five fixed stages run once per input: understanding, context, hypothesis
//! generation, validation and planning. Low understanding confidence stops
//! after the first stage with a clarification plan; a hypothesis that fails
//! validation is answered with a fallback plan.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Turn a request plus memory into a ranked hypothesis and plan

use regex::Regex;
use sentio_cortex::application::MemoryStore;
use sentio_cortex::domain::IntentClassifier;
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info};

use crate::domain::agent_config::ReasoningConfig;
use crate::domain::error::PipelineError;
use crate::domain::reasoning::{
    ActionParameters, ActionPlan, ActionStep, ContextAnalysis, Hypothesis, ReasoningResult,
    ReasoningStep, StepInput, StepKind, StepOutput, Understanding, ValidationOutcome,
};

static PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)["']?([/\\][\w\-./\\]+)["']?(?:\s|$)"#).expect("hardcoded regex")
});

static KEY_VALUE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+)=["']?([^\s'"]+)["']?"#).expect("hardcoded regex"));

/// First absolute path in `text` (under `path`) plus every `key=value` pair.
pub fn extract_entities(text: &str) -> BTreeMap<String, String> {
    let mut entities = BTreeMap::new();
    for caps in KEY_VALUE_PATTERN.captures_iter(text) {
        entities.insert(caps[1].to_string(), caps[2].to_string());
    }
    if let Some(caps) = PATH_PATTERN.captures(text) {
        entities.insert("path".to_string(), caps[1].to_string());
    }
    entities
}

pub struct ReasoningPipeline {
    classifier: Arc<dyn IntentClassifier>,
    config: ReasoningConfig,
}

impl ReasoningPipeline {
    pub fn new(classifier: Arc<dyn IntentClassifier>, config: ReasoningConfig) -> Self {
        Self { classifier, config }
    }

    pub fn config(&self) -> &ReasoningConfig {
        &self.config
    }

    pub async fn process(
        &self,
        memory: &MemoryStore,
        input: &str,
    ) -> Result<ReasoningResult, PipelineError> {
        let mut steps = Vec::with_capacity(5);

        let understanding = self.understand(input).await?;
        steps.push(ReasoningStep::new(
            StepKind::Understanding,
            StepInput::Understanding {
                text: input.to_string(),
            },
            StepOutput::Understanding(understanding.clone()),
            understanding.confidence,
        ));

        if understanding.confidence < self.config.understanding_threshold {
            info!(
                intent = %understanding.intent,
                confidence = understanding.confidence,
                "Understanding below threshold, asking for clarification"
            );
            return Ok(self.clarification(steps, &understanding));
        }

        let context = self.analyze_context(memory, input, &understanding).await?;
        let relevance = self.context_relevance(&context);
        steps.push(ReasoningStep::new(
            StepKind::Context,
            StepInput::Context {
                text: input.to_string(),
                understanding: understanding.clone(),
            },
            StepOutput::Context(context.clone()),
            relevance,
        ));

        let hypotheses = self.generate_hypotheses(&understanding, &context);
        let final_hypothesis = select_hypothesis(&hypotheses);
        steps.push(ReasoningStep::new(
            StepKind::Hypothesis,
            StepInput::Hypothesis {
                understanding: understanding.clone(),
                context: context.clone(),
            },
            StepOutput::Hypotheses(hypotheses),
            final_hypothesis.confidence,
        ));

        let (validation, validation_confidence) = self.validate(&final_hypothesis, &context);
        steps.push(ReasoningStep::new(
            StepKind::Validation,
            StepInput::Validation {
                hypothesis: final_hypothesis.clone(),
            },
            StepOutput::Validation(validation),
            validation_confidence,
        ));

        if !validation.is_valid {
            info!(
                confidence = final_hypothesis.confidence,
                "Hypothesis failed validation, using fallback plan"
            );
            return Ok(self.fallback(steps, final_hypothesis, &understanding));
        }

        let action_plan = self.plan(&final_hypothesis, &understanding);
        steps.push(ReasoningStep::new(
            StepKind::Planning,
            StepInput::Planning {
                hypothesis: final_hypothesis.clone(),
            },
            StepOutput::Plan(action_plan.clone()),
            action_plan.estimated_success,
        ));

        let explanation = steps
            .iter()
            .map(|step| {
                format!(
                    "{}: {} (confidence: {})",
                    step.kind.as_str().to_uppercase(),
                    step.output_json(),
                    step.confidence
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        info!(
            intent = %understanding.intent,
            confidence = validation_confidence,
            estimated_success = action_plan.estimated_success,
            "Reasoning complete"
        );

        Ok(ReasoningResult {
            steps,
            final_hypothesis,
            action_plan,
            confidence: validation_confidence,
            explanation,
        })
    }

    async fn understand(&self, input: &str) -> Result<Understanding, PipelineError> {
        let prediction = self.classifier.predict(input).await?;
        let understanding = Understanding {
            intent: prediction.command_type,
            confidence: prediction.confidence,
            entities: extract_entities(input),
        };
        debug!(
            intent = %understanding.intent,
            confidence = understanding.confidence,
            entities = understanding.entities.len(),
            "Understanding stage"
        );
        Ok(understanding)
    }

    async fn analyze_context(
        &self,
        memory: &MemoryStore,
        input: &str,
        understanding: &Understanding,
    ) -> Result<ContextAnalysis, PipelineError> {
        let summary = memory.summarize(input).await?;
        let intent = understanding.intent.as_str().to_lowercase();
        let preferences = summary
            .preferences
            .into_iter()
            .filter(|p| p.category.to_lowercase().contains(&intent))
            .collect();

        Ok(ContextAnalysis {
            relevant_history: summary.relevant_history,
            preferences,
            system_state: summary.system_state,
        })
    }

    fn context_relevance(&self, context: &ContextAnalysis) -> f64 {
        let weights = &self.config.relevance_weights;
        let healthy = context
            .system_state
            .resources_below(self.config.health_limit, self.config.health_limit)
            && context.system_state.last_error.is_none();

        let relevance = indicator(!context.relevant_history.is_empty()) * weights.history
            + indicator(!context.preferences.is_empty()) * weights.preferences
            + indicator(healthy) * weights.healthy_system;
        debug!(
            history = context.relevant_history.len(),
            preferences = context.preferences.len(),
            healthy,
            relevance,
            "Context stage"
        );
        relevance
    }

    fn generate_hypotheses(
        &self,
        understanding: &Understanding,
        context: &ContextAnalysis,
    ) -> Vec<Hypothesis> {
        let confidence = understanding.confidence;
        let history = context.relevant_history.len();

        let mut primary = Hypothesis::new(
            format!(
                "User intends to {} with confidence {} based on {} relevant past interactions",
                understanding.intent, confidence, history
            ),
            confidence,
        );
        if confidence > self.config.understanding_threshold {
            primary
                .supporting_evidence
                .push(format!("High confidence in intent understanding: {confidence}"));
        }
        if history > 0 {
            primary
                .supporting_evidence
                .push(format!("{history} similar past interactions found"));
        }
        if confidence < self.config.understanding_threshold {
            primary
                .counter_evidence
                .push(format!("Low confidence in intent understanding: {confidence}"));
        }
        if let Some(error) = &context.system_state.last_error {
            primary
                .counter_evidence
                .push(format!("Recent system error: {}", error.message));
        }

        let mut hypotheses = vec![primary];

        if let Some(similar) = context.relevant_history.first() {
            let mut alternative = Hypothesis::new(
                format!(
                    "Alternative interpretation based on similar past interaction: {}",
                    similar.input
                ),
                confidence * self.config.alternative_discount,
            );
            alternative.supporting_evidence.push(format!(
                "Similar interaction found with success: {}",
                similar.metadata.is_successful()
            ));
            alternative
                .counter_evidence
                .push("Based on historical similarity, not current intent".to_string());
            hypotheses.push(alternative);
        }

        hypotheses
    }

    fn validate(&self, hypothesis: &Hypothesis, context: &ContextAnalysis) -> (ValidationOutcome, f64) {
        let above = hypothesis.confidence >= self.config.validation_threshold;
        let outcome = ValidationOutcome {
            is_valid: above,
            constraints_satisfied: hypothesis.counter_evidence.is_empty(),
            risks_acceptable: above,
            resources_available: context
                .system_state
                .resources_below(self.config.resource_limit, self.config.resource_limit),
        };

        let weights = &self.config.validation_weights;
        let confidence = indicator(outcome.is_valid) * weights.valid
            + indicator(outcome.constraints_satisfied) * weights.constraints
            + indicator(outcome.risks_acceptable) * weights.risks
            + indicator(outcome.resources_available) * weights.resources;

        debug!(?outcome, confidence, "Validation stage");
        (outcome, confidence)
    }

    fn plan(&self, hypothesis: &Hypothesis, understanding: &Understanding) -> ActionPlan {
        let steps = vec![ActionStep {
            action: "execute".to_string(),
            parameters: ActionParameters {
                intent: Some(hypothesis.description.clone()),
                command_type: Some(understanding.intent),
                confidence: Some(hypothesis.confidence),
                entities: understanding.entities.clone(),
                ..Default::default()
            },
            expected_outcome: "Successful execution of user intent".to_string(),
            confidence: hypothesis.confidence,
            fallback: Some("Request clarification from user".to_string()),
        }];

        let mut potential_risks = Vec::new();
        if steps
            .iter()
            .any(|step| step.confidence < self.config.validation_threshold)
        {
            potential_risks.push("Low confidence in some action steps".to_string());
        }

        let product: f64 = steps.iter().map(|step| step.confidence).product();
        let estimated_success =
            (product - self.config.risk_penalty * potential_risks.len() as f64).clamp(0.0, 1.0);

        ActionPlan {
            steps,
            estimated_success,
            potential_risks,
        }
    }

    fn clarification(&self, steps: Vec<ReasoningStep>, understanding: &Understanding) -> ReasoningResult {
        let confidence = understanding.confidence;
        let mut hypothesis = Hypothesis::new("Insufficient confidence in understanding", confidence);
        hypothesis
            .counter_evidence
            .push(format!("Low confidence: {confidence}"));

        ReasoningResult {
            steps,
            final_hypothesis: hypothesis,
            action_plan: ActionPlan {
                steps: vec![ActionStep {
                    action: "clarify".to_string(),
                    parameters: ActionParameters {
                        command_type: Some(understanding.intent),
                        confidence: Some(confidence),
                        entities: understanding.entities.clone(),
                        ..Default::default()
                    },
                    expected_outcome: "Get clarification from user".to_string(),
                    confidence,
                    fallback: None,
                }],
                estimated_success: self.config.clarification_success,
                potential_risks: vec!["User frustration from additional interaction".to_string()],
            },
            confidence,
            explanation: "Need clarification due to low confidence in understanding".to_string(),
        }
    }

    fn fallback(
        &self,
        steps: Vec<ReasoningStep>,
        hypothesis: Hypothesis,
        understanding: &Understanding,
    ) -> ReasoningResult {
        let confidence = hypothesis.confidence * self.config.fallback_discount;
        ReasoningResult {
            steps,
            action_plan: ActionPlan {
                steps: vec![ActionStep {
                    action: "fallback".to_string(),
                    parameters: ActionParameters {
                        command_type: Some(understanding.intent),
                        entities: understanding.entities.clone(),
                        original_hypothesis: Some(Box::new(hypothesis.clone())),
                        ..Default::default()
                    },
                    expected_outcome: "Execute safe fallback action".to_string(),
                    confidence,
                    fallback: None,
                }],
                estimated_success: self.config.fallback_success,
                potential_risks: vec!["May not fully address user intent".to_string()],
            },
            final_hypothesis: hypothesis,
            confidence,
            explanation: "Using fallback plan due to validation failure".to_string(),
        }
    }
}

/// Highest confidence wins; the earliest candidate wins ties.
fn select_hypothesis(hypotheses: &[Hypothesis]) -> Hypothesis {
    let mut best = &hypotheses[0];
    for candidate in &hypotheses[1..] {
        if candidate.confidence > best.confidence {
            best = candidate;
        }
    }
    best.clone()
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}
