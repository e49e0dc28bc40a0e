// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::decision::{DecisionId, MitigationStrategy};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionEvent {
    DecisionMade {
        decision_id: DecisionId,
        action: String,
        confidence: f64,
        uncertainty: f64,
        alternatives: usize,
        made_at: DateTime<Utc>,
    },
    MitigationApplied {
        decision_id: DecisionId,
        strategy: MitigationStrategy,
        applied_at: DateTime<Utc>,
    },
    DecisionExecuted {
        decision_id: DecisionId,
        action: String,
        execution_time_ms: u64,
        executed_at: DateTime<Utc>,
    },
    DecisionFailed {
        decision_id: DecisionId,
        action: String,
        error: String,
        failed_at: DateTime<Utc>,
    },
}

impl DecisionEvent {
    pub fn decision_id(&self) -> DecisionId {
        match self {
            DecisionEvent::DecisionMade { decision_id, .. }
            | DecisionEvent::MitigationApplied { decision_id, .. }
            | DecisionEvent::DecisionExecuted { decision_id, .. }
            | DecisionEvent::DecisionFailed { decision_id, .. } => *decision_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_event_made_serialization() {
        let decision_id = DecisionId::new();
        let event = DecisionEvent::DecisionMade {
            decision_id,
            action: "execute".to_string(),
            confidence: 0.84,
            uncertainty: 0.21,
            alternatives: 0,
            made_at: Utc::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"decision_made\""));
        let parsed: DecisionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.decision_id(), decision_id);
    }

    #[test]
    fn test_mitigation_applied_serialization() {
        let event = DecisionEvent::MitigationApplied {
            decision_id: DecisionId::new(),
            strategy: MitigationStrategy::RequestConfirmation,
            applied_at: Utc::now(),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["strategy"], "request_confirmation");
    }
}
