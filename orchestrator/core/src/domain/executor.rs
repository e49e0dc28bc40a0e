// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Command Executor Domain Interface (Anti-Corruption Layer)
//
// Isolates the decision maker from whatever actually touches the host:
// shell, file system, browser automation. Implementations live in
// infrastructure/.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::reasoning::ActionParameters;

#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Carry out `action`. A returned outcome may still report failure;
    /// `Err` means the executor itself could not run.
    async fn execute(
        &self,
        action: &str,
        parameters: &ActionParameters,
    ) -> Result<CommandOutcome, ExecutorError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandOutcome {
    pub fn succeeded(output: serde_json::Value) -> Self {
        Self {
            success: true,
            output: Some(output),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("Unsupported action: {0}")]
    UnsupportedAction(String),

    #[error("Execution rejected: {0}")]
    Rejected(String),

    #[error("Execution timed out after {0} ms")]
    Timeout(u64),

    #[error("Executor failure: {0}")]
    Failed(String),
}
