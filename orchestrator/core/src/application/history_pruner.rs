// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! History Pruner - Background task that enforces turn retention
//!
//! Periodically asks the agent session to drop conversation turns older
//! than the memory retention period.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Keeps conversational memory inside its retention window

use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::session::AgentHandle;
use crate::domain::agent_config::PrunerConfig;
use crate::domain::error::SessionError;

/// History Pruner - Background task
pub struct HistoryPruner {
    session: AgentHandle,
    config: PrunerConfig,
    shutdown_token: CancellationToken,
}

impl HistoryPruner {
    pub fn new(session: AgentHandle, config: PrunerConfig) -> Self {
        Self {
            session,
            config,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Get a handle to trigger shutdown
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Start the pruner background task
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Run the pruner loop until shutdown or until the session closes
    async fn run(&self) {
        if !self.config.enabled {
            info!("History pruner is disabled");
            return;
        }

        info!(
            interval_seconds = self.config.interval_seconds,
            "Starting history pruner background task"
        );

        let mut tick = interval(Duration::from_secs(self.config.interval_seconds.max(1)));

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    debug!("Running history pruner cycle");

                    match self.prune_cycle().await {
                        Ok(removed) => {
                            debug!(removed, "History pruner cycle completed");
                        }
                        Err(SessionError::Closed) => {
                            info!("Agent session closed, stopping history pruner");
                            break;
                        }
                        Err(e) => {
                            warn!("History pruner cycle failed: {}", e);
                        }
                    }
                }
                _ = self.shutdown_token.cancelled() => {
                    info!("Shutdown signal received, stopping history pruner");
                    break;
                }
            }
        }

        info!("History pruner background task stopped");
    }

    /// Execute a single pruning cycle
    async fn prune_cycle(&self) -> Result<usize, SessionError> {
        self.session.purge_expired(Utc::now()).await
    }
}
