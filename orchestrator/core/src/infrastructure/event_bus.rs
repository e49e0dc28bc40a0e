// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Event Bus Implementation - Pub/Sub for Domain Events
//
// Provides in-memory event streaming using tokio broadcast channels.
// Lets the CLI and other observers follow decisions and learning as they
// happen. Events are not persisted.

use chrono::Utc;
use sentio_cortex::domain::{CortexEvent, InteractionOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::domain::decision::DecisionId;
use crate::domain::events::DecisionEvent;

/// Unified domain event type for the event bus
/// Wrapped events keep their own `type` tag under `event`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "category", content = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    Decision(DecisionEvent),
    Learning(CortexEvent),
}

/// Event bus for publishing and subscribing to domain events
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with specified channel capacity
    /// Capacity determines how many events can be buffered before dropping old ones
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Create event bus with default capacity (1000)
    pub fn with_default_capacity() -> Self {
        Self::new(1000)
    }

    pub fn publish_decision_event(&self, event: DecisionEvent) {
        self.publish(DomainEvent::Decision(event));
    }

    pub fn publish_learning_event(&self, event: CortexEvent) {
        self.publish(DomainEvent::Learning(event));
    }

    /// Fan one `record_interaction` outcome out into learning events
    pub fn publish_interaction_outcome(&self, outcome: &InteractionOutcome, previous_rate: f64) {
        let metrics = &outcome.metrics;
        self.publish_learning_event(CortexEvent::InteractionRecorded {
            accuracy: metrics.accuracy,
            accuracy_source: metrics.accuracy_source,
            confidence: metrics.confidence,
            drift_score: metrics.drift_score,
            timestamp: metrics.timestamp,
        });

        if outcome.drift.detected {
            self.publish_learning_event(CortexEvent::ConceptDriftDetected {
                severity: outcome.drift.severity,
                affected_concepts: outcome.drift.affected_concepts.clone(),
                timestamp: outcome.drift.timestamp,
            });
        }

        if let Some(applied) = &outcome.adaptation {
            self.publish_learning_event(CortexEvent::AdaptationApplied {
                kind: applied.strategy.kind,
                priority: applied.strategy.priority,
                examples: applied.examples,
                timestamp: Utc::now(),
            });
        }

        if let Some(new_rate) = outcome.learning_rate {
            self.publish_learning_event(CortexEvent::LearningRateAdjusted {
                old_rate: previous_rate,
                new_rate,
                timestamp: Utc::now(),
            });
        }
    }

    /// Publish a domain event to all subscribers
    fn publish(&self, event: DomainEvent) {
        debug!("Publishing event: {:?}", event);

        // send() only fails when nobody is subscribed
        let receiver_count = self.sender.send(event).unwrap_or(0);

        if receiver_count == 0 {
            debug!("No subscribers listening to event");
        }
    }

    /// Subscribe to all domain events
    pub fn subscribe(&self) -> EventReceiver {
        let receiver = self.sender.subscribe();
        EventReceiver { receiver }
    }

    /// Subscribe and filter for a single decision
    pub fn subscribe_decision(&self, decision_id: DecisionId) -> DecisionEventReceiver {
        let receiver = self.sender.subscribe();
        DecisionEventReceiver {
            receiver,
            decision_id,
        }
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

fn map_recv_error(e: broadcast::error::RecvError) -> EventBusError {
    match e {
        broadcast::error::RecvError::Closed => EventBusError::Closed,
        broadcast::error::RecvError::Lagged(n) => {
            warn!("Event receiver lagged by {} events", n);
            EventBusError::Lagged(n)
        }
    }
}

/// Receiver for all domain events
pub struct EventReceiver {
    receiver: broadcast::Receiver<DomainEvent>,
}

impl EventReceiver {
    /// Receive the next event (waits until one is available)
    pub async fn recv(&mut self) -> Result<DomainEvent, EventBusError> {
        self.receiver.recv().await.map_err(map_recv_error)
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&mut self) -> Result<DomainEvent, EventBusError> {
        self.receiver.try_recv().map_err(|e| match e {
            broadcast::error::TryRecvError::Empty => EventBusError::Empty,
            broadcast::error::TryRecvError::Closed => EventBusError::Closed,
            broadcast::error::TryRecvError::Lagged(n) => {
                warn!("Event receiver lagged by {} events", n);
                EventBusError::Lagged(n)
            }
        })
    }
}

/// Receiver for one decision's events (filtered)
pub struct DecisionEventReceiver {
    receiver: broadcast::Receiver<DomainEvent>,
    decision_id: DecisionId,
}

impl DecisionEventReceiver {
    /// Receive the next event for the watched decision, skipping all others
    pub async fn recv(&mut self) -> Result<DecisionEvent, EventBusError> {
        loop {
            let event = self.receiver.recv().await.map_err(map_recv_error)?;
            if let DomainEvent::Decision(decision_event) = event {
                if decision_event.decision_id() == self.decision_id {
                    return Ok(decision_event);
                }
            }
        }
    }
}

/// Errors that can occur when receiving events
#[derive(Debug, thiserror::Error)]
pub enum EventBusError {
    #[error("Event bus is closed")]
    Closed,

    #[error("No events available")]
    Empty,

    #[error("Receiver lagged by {0} events (events were dropped)")]
    Lagged(u64),
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
