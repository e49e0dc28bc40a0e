// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Conversation
//!
//! Turns, preferences and the host snapshot held by the memory store.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Value types for conversational memory

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::CortexError;
use super::intent::CommandType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnId(pub Uuid);

impl TurnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What is known about a turn once it has been handled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<CommandType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub executed_commands: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TurnMetadata {
    pub fn succeeded(intent: CommandType, confidence: f64, command: impl Into<String>) -> Self {
        Self {
            intent: Some(intent),
            confidence: Some(confidence),
            executed_commands: vec![command.into()],
            success: Some(true),
            error: None,
        }
    }

    pub fn failed(intent: Option<CommandType>, error: impl Into<String>) -> Self {
        Self {
            intent,
            success: Some(false),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), CortexError> {
        if let Some(confidence) = self.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(CortexError::InvalidMetadata(format!(
                    "confidence {confidence} outside [0, 1]"
                )));
            }
        }
        if self.executed_commands.iter().any(|c| c.trim().is_empty()) {
            return Err(CortexError::InvalidMetadata(
                "executed command names must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_successful(&self) -> bool {
        self.success == Some(true)
    }
}

/// One user/agent exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: TurnId,
    pub timestamp: DateTime<Utc>,
    pub input: String,
    pub response: String,
    /// Derived from `input` by the encoder; not serialized
    #[serde(default, skip_serializing)]
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub metadata: TurnMetadata,
}

impl ConversationTurn {
    /// Age of the turn relative to `now`, in fractional hours.
    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        (now - self.timestamp).num_milliseconds() as f64 / 3_600_000.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreference {
    pub id: Uuid,
    pub category: String,
    pub value: serde_json::Value,
    pub confidence: f64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    /// Fraction of CPU in use, [0, 1]
    pub cpu: f64,
    /// Fraction of memory in use, [0, 1]
    pub memory: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemError {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl SystemError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Snapshot of the host the agent acts on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    pub active_commands: Vec<String>,
    pub resource_usage: ResourceUsage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<SystemError>,
}

impl SystemState {
    /// Both resource fractions strictly below their limits.
    pub fn resources_below(&self, cpu_limit: f64, memory_limit: f64) -> bool {
        self.resource_usage.cpu < cpu_limit && self.resource_usage.memory < memory_limit
    }

    pub fn apply(&mut self, update: SystemStateUpdate) {
        if let Some(active_commands) = update.active_commands {
            self.active_commands = active_commands;
        }
        if let Some(resource_usage) = update.resource_usage {
            self.resource_usage = resource_usage;
        }
        if let Some(last_error) = update.last_error {
            self.last_error = last_error;
        }
    }
}

/// Partial update merged into [`SystemState`]. `None` fields are left as is;
/// `last_error: Some(None)` clears the recorded error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemStateUpdate {
    #[serde(default)]
    pub active_commands: Option<Vec<String>>,
    #[serde(default)]
    pub resource_usage: Option<ResourceUsage>,
    #[serde(default)]
    pub last_error: Option<Option<SystemError>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextSummary {
    pub relevant_history: Vec<ConversationTurn>,
    pub preferences: Vec<UserPreference>,
    pub system_state: SystemState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorAnalysis {
    /// Most frequent input bigrams
    pub common_patterns: Vec<String>,
    /// Most frequently executed commands
    pub preferred_commands: Vec<String>,
    /// Most frequent error messages
    pub error_patterns: Vec<String>,
}
