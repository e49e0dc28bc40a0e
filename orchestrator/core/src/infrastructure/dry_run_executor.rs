// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Dry-run Command Executor
//
// Acknowledges every action without touching the host and keeps a log of
// what it was asked to do. A failure can be staged for the next action, so
// scripted runs can exercise the failure path. Used by the CLI and by tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use tracing::info;

use crate::domain::executor::{CommandExecutor, CommandOutcome, ExecutorError};
use crate::domain::reasoning::ActionParameters;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedAction {
    pub action: String,
    pub parameters: ActionParameters,
}

#[derive(Default)]
pub struct DryRunExecutor {
    recorded: Mutex<Vec<RecordedAction>>,
    staged_failure: Mutex<Option<String>>,
}

impl DryRunExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions received so far, oldest first
    pub fn recorded(&self) -> Vec<RecordedAction> {
        self.recorded.lock().clone()
    }

    /// Make the next action report failure with `reason`.
    ///
    /// The action is still recorded. Staging again before it runs replaces
    /// the reason.
    pub fn fail_next(&self, reason: impl Into<String>) {
        *self.staged_failure.lock() = Some(reason.into());
    }

    /// Drop a staged failure that no action consumed.
    pub fn clear_staged_failure(&self) -> Option<String> {
        self.staged_failure.lock().take()
    }
}

#[async_trait]
impl CommandExecutor for DryRunExecutor {
    async fn execute(
        &self,
        action: &str,
        parameters: &ActionParameters,
    ) -> Result<CommandOutcome, ExecutorError> {
        if action.trim().is_empty() {
            return Err(ExecutorError::UnsupportedAction(action.to_string()));
        }

        info!(
            action,
            safe_mode = parameters.safe_mode,
            require_confirmation = parameters.require_confirmation,
            timeout_ms = ?parameters.timeout_ms,
            "Dry-run execution"
        );

        self.recorded.lock().push(RecordedAction {
            action: action.to_string(),
            parameters: parameters.clone(),
        });

        if let Some(reason) = self.staged_failure.lock().take() {
            return Ok(CommandOutcome::failed(reason));
        }

        Ok(CommandOutcome::succeeded(json!({
            "executed": action,
            "dry_run": true,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_and_acknowledges() {
        let executor = DryRunExecutor::new();
        let params = ActionParameters {
            safe_mode: true,
            ..Default::default()
        };

        let outcome = executor.execute("safe_execute", &params).await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.output.unwrap()["executed"], "safe_execute");

        let recorded = executor.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].action, "safe_execute");
        assert!(recorded[0].parameters.safe_mode);
    }

    #[tokio::test]
    async fn test_blank_action_is_unsupported() {
        let executor = DryRunExecutor::new();
        let err = executor
            .execute("  ", &ActionParameters::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutorError::UnsupportedAction(_)));
        assert!(executor.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_staged_failure_applies_once() {
        let executor = DryRunExecutor::new();
        executor.fail_next("disk full");

        let failed = executor
            .execute("open_file", &ActionParameters::default())
            .await
            .unwrap();
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("disk full"));

        let next = executor
            .execute("open_file", &ActionParameters::default())
            .await
            .unwrap();
        assert!(next.success);
        assert_eq!(executor.recorded().len(), 2);
        assert_eq!(executor.clear_staged_failure(), None);
    }
}
