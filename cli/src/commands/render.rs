// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Terminal rendering shared by the agent commands

use colored::Colorize;
use sentio_core::application::AgentResponse;
use sentio_core::domain::events::DecisionEvent;
use sentio_core::infrastructure::{DomainEvent, EventReceiver};
use sentio_cortex::domain::{BehaviorAnalysis, CortexEvent, PerformanceReport};

pub fn print_response(response: &AgentResponse, verbose: bool) {
    let decision = &response.decision;
    let status = match &response.execution {
        Some(execution) if execution.success => "✓".green(),
        Some(_) => "✗".red(),
        None => "?".yellow(),
    };

    println!("{} {}", status, response.response);
    println!(
        "  {} {}  {} {:.2}  {} {:.2}",
        "action:".dimmed(),
        decision.action.bold(),
        "confidence:".dimmed(),
        decision.confidence,
        "uncertainty:".dimmed(),
        decision.uncertainty.total
    );

    if let Some(execution) = &response.execution {
        if !execution.applied_mitigations.is_empty() {
            println!("  {}", "mitigations:".dimmed());
            for strategy in &execution.applied_mitigations {
                println!("    - {}", strategy);
            }
        }
    }

    if !decision.alternatives.is_empty() {
        println!("  {}", "alternatives:".dimmed());
        for alternative in &decision.alternatives {
            println!(
                "    - {} ({:.2})",
                alternative.action, alternative.confidence
            );
        }
    }

    if verbose {
        println!("  {}", "explanation:".dimmed());
        for line in decision.explanation.lines() {
            println!("    {}", line);
        }
    }
}

pub fn print_report(report: &PerformanceReport) {
    println!("{}", "Performance report:".bold());
    println!("  Overall accuracy: {:.3}", report.overall_accuracy);
    println!("  Adaptation rate: {:.3}", report.adaptation_rate);

    let drift = &report.drift_status;
    if drift.detected {
        let concepts: Vec<&str> = drift.affected_concepts.iter().map(|c| c.as_str()).collect();
        println!(
            "  Concept drift: {} (severity {:.3}, concepts: {})",
            "detected".yellow(),
            drift.severity,
            concepts.join(", ")
        );
    } else {
        println!("  Concept drift: {}", "none".green());
    }

    if !report.recommendations.is_empty() {
        println!("  Recommendations:");
        for recommendation in &report.recommendations {
            println!("    - {}", recommendation);
        }
    }
}

pub fn print_behavior(behavior: &BehaviorAnalysis) {
    println!("{}", "Behavior analysis:".bold());
    print_list("Common patterns", &behavior.common_patterns);
    print_list("Preferred commands", &behavior.preferred_commands);
    print_list("Error patterns", &behavior.error_patterns);
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        println!("  {}: {}", title, "(none)".dimmed());
    } else {
        println!("  {}: {}", title, items.join(", "));
    }
}

/// One line per event; returns how many were printed.
pub fn drain_events(receiver: &mut EventReceiver) -> usize {
    let mut printed = 0;
    while let Ok(event) = receiver.try_recv() {
        println!("  {} {}", "event".cyan(), describe_event(&event));
        printed += 1;
    }
    printed
}

pub fn describe_event(event: &DomainEvent) -> String {
    match event {
        DomainEvent::Decision(event) => match event {
            DecisionEvent::DecisionMade {
                action,
                confidence,
                uncertainty,
                alternatives,
                ..
            } => format!(
                "decision_made action={action} confidence={confidence:.2} uncertainty={uncertainty:.2} alternatives={alternatives}"
            ),
            DecisionEvent::MitigationApplied { strategy, .. } => {
                format!("mitigation_applied strategy=\"{strategy}\"")
            }
            DecisionEvent::DecisionExecuted {
                action,
                execution_time_ms,
                ..
            } => format!("decision_executed action={action} time_ms={execution_time_ms}"),
            DecisionEvent::DecisionFailed { action, error, .. } => {
                format!("decision_failed action={action} error=\"{error}\"")
            }
        },
        DomainEvent::Learning(event) => match event {
            CortexEvent::TurnRecorded { history_len, .. } => {
                format!("turn_recorded history_len={history_len}")
            }
            CortexEvent::TurnsPurged { removed, .. } => format!("turns_purged removed={removed}"),
            CortexEvent::InteractionRecorded {
                accuracy,
                confidence,
                drift_score,
                ..
            } => format!(
                "interaction_recorded accuracy={accuracy:.2} confidence={confidence:.2} drift_score={drift_score:.3}"
            ),
            CortexEvent::ConceptDriftDetected { severity, .. } => {
                format!("concept_drift_detected severity={severity:.3}")
            }
            CortexEvent::AdaptationApplied {
                kind,
                priority,
                examples,
                ..
            } => format!("adaptation_applied kind={kind:?} priority={priority} examples={examples}"),
            CortexEvent::LearningRateAdjusted {
                old_rate, new_rate, ..
            } => format!("learning_rate_adjusted old={old_rate:.5} new={new_rate:.5}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_describe_learning_rate_event() {
        let event = DomainEvent::Learning(CortexEvent::LearningRateAdjusted {
            old_rate: 0.001,
            new_rate: 0.0011,
            timestamp: Utc::now(),
        });
        assert_eq!(
            describe_event(&event),
            "learning_rate_adjusted old=0.00100 new=0.00110"
        );
    }
}
