// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Embedded agent
//!
//! Builds an agent in-process from the discovered manifest, moves it onto
//! its session task and starts the history pruner next to it.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use sentio_core::application::{session, Agent, AgentHandle, HistoryPruner};
use sentio_core::domain::agent_config::AgentConfigManifest;
use sentio_core::infrastructure::{DryRunExecutor, EventBus, EventReceiver};
use sentio_cortex::domain::IntentClassifier;
use sentio_cortex::infrastructure::{KeywordIntentClassifier, VocabularyEncoder};

/// Commands queued per session before callers wait
const SESSION_CAPACITY: usize = 32;

pub struct EmbeddedAgent {
    manifest: AgentConfigManifest,
    handle: AgentHandle,
    session_task: JoinHandle<Agent>,
    pruner_shutdown: CancellationToken,
    pruner_task: JoinHandle<()>,
    event_bus: EventBus,
    executor: Arc<DryRunExecutor>,
}

impl EmbeddedAgent {
    /// Load, validate and start from `--config` or the discovery chain.
    pub async fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let manifest = AgentConfigManifest::load_or_default(config_path)
            .context("Failed to load configuration")?;
        Self::from_manifest(manifest).await
    }

    pub async fn from_manifest(manifest: AgentConfigManifest) -> Result<Self> {
        manifest
            .validate()
            .context("Configuration validation failed")?;

        let spec = &manifest.spec;
        let classifier = Arc::new(KeywordIntentClassifier::new());
        classifier
            .initialize()
            .await
            .context("Failed to initialize intent classifier")?;

        let event_bus = EventBus::new(spec.observability.event_bus_capacity);
        let executor = Arc::new(DryRunExecutor::new());
        let agent = Agent::new(
            spec,
            classifier,
            Arc::new(VocabularyEncoder::default()),
            executor.clone(),
            event_bus.clone(),
        );

        let (handle, session_task) = session::spawn(agent, SESSION_CAPACITY);

        let pruner = Arc::new(HistoryPruner::new(handle.clone(), spec.pruner.clone()));
        let pruner_shutdown = pruner.shutdown_token();
        let pruner_task = pruner.start();

        info!(agent = %manifest.metadata.name, "Embedded agent started");

        Ok(Self {
            manifest,
            handle,
            session_task,
            pruner_shutdown,
            pruner_task,
            event_bus,
            executor,
        })
    }

    pub fn manifest(&self) -> &AgentConfigManifest {
        &self.manifest
    }

    pub fn handle(&self) -> &AgentHandle {
        &self.handle
    }

    pub fn executor(&self) -> &DryRunExecutor {
        &self.executor
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.event_bus.subscribe()
    }

    /// Stop the pruner, close the session and hand back the agent.
    pub async fn shutdown(self) -> Result<Agent> {
        self.pruner_shutdown.cancel();
        self.pruner_task
            .await
            .context("History pruner task panicked")?;

        drop(self.handle);
        let agent = self
            .session_task
            .await
            .context("Agent session task panicked")?;

        info!(turns = agent.memory().len(), "Embedded agent stopped");
        Ok(agent)
    }
}
