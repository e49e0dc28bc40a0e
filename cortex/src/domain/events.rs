// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Domain events for the Cortex bounded context
//! Emitted for memory and learning operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::conversation::TurnId;
use super::intent::CommandType;
use super::learning::{AccuracySource, AdaptationKind};

/// Cortex domain events
/// These events are published to the EventBus for observability and integration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CortexEvent {
    /// A conversation turn was stored
    TurnRecorded {
        turn_id: TurnId,
        intent: Option<CommandType>,
        history_len: usize,
        timestamp: DateTime<Utc>,
    },

    /// Turns past retention were dropped
    TurnsPurged {
        removed: usize,
        retention_days: i64,
        timestamp: DateTime<Utc>,
    },

    /// A performance sample was appended to the metrics window
    InteractionRecorded {
        accuracy: f64,
        accuracy_source: AccuracySource,
        confidence: f64,
        drift_score: f64,
        timestamp: DateTime<Utc>,
    },

    /// The two trailing metric windows diverged
    ConceptDriftDetected {
        severity: f64,
        affected_concepts: Vec<CommandType>,
        timestamp: DateTime<Utc>,
    },

    /// A retrain / fine-tune / reset was run against the classifier
    AdaptationApplied {
        kind: AdaptationKind,
        priority: u8,
        examples: usize,
        timestamp: DateTime<Utc>,
    },

    /// Meta-learning rescaled the classifier learning rate
    LearningRateAdjusted {
        old_rate: f64,
        new_rate: f64,
        timestamp: DateTime<Utc>,
    },
}

impl CortexEvent {
    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            CortexEvent::TurnRecorded { timestamp, .. } => *timestamp,
            CortexEvent::TurnsPurged { timestamp, .. } => *timestamp,
            CortexEvent::InteractionRecorded { timestamp, .. } => *timestamp,
            CortexEvent::ConceptDriftDetected { timestamp, .. } => *timestamp,
            CortexEvent::AdaptationApplied { timestamp, .. } => *timestamp,
            CortexEvent::LearningRateAdjusted { timestamp, .. } => *timestamp,
        }
    }

    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            CortexEvent::TurnRecorded { .. } => "turn_recorded",
            CortexEvent::TurnsPurged { .. } => "turns_purged",
            CortexEvent::InteractionRecorded { .. } => "interaction_recorded",
            CortexEvent::ConceptDriftDetected { .. } => "concept_drift_detected",
            CortexEvent::AdaptationApplied { .. } => "adaptation_applied",
            CortexEvent::LearningRateAdjusted { .. } => "learning_rate_adjusted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = CortexEvent::ConceptDriftDetected {
            severity: 0.42,
            affected_concepts: vec![CommandType::Web],
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"concept_drift_detected\""));
        let deserialized: CortexEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(event.event_type(), deserialized.event_type());
        assert_eq!(event.timestamp(), deserialized.timestamp());
    }

    #[test]
    fn test_adaptation_kind_tag() {
        let event = CortexEvent::AdaptationApplied {
            kind: AdaptationKind::FineTune,
            priority: 2,
            examples: 3,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "fine_tune");
    }
}
