// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Agent Session - single-writer access to an [`Agent`]
//!
//! The agent lives on its own task. Callers hold a cloneable [`AgentHandle`]
//! that sends commands over a bounded channel; each command carries a
//! oneshot sender for its reply. Commands are applied one at a time in
//! arrival order. The task ends, handing the agent back, once every handle
//! is dropped.

use chrono::{DateTime, Utc};
use sentio_cortex::domain::{
    BehaviorAnalysis, Feedback, InteractionOutcome, InteractionResult, PerformanceReport,
    SystemStateUpdate, TurnId, TurnMetadata,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::application::agent::{Agent, AgentResponse};
use crate::domain::decision::{Decision, ExecutionResult};
use crate::domain::error::{PipelineError, SessionError};
use crate::domain::reasoning::ReasoningResult;

type Reply<T> = oneshot::Sender<T>;
type PipelineReply<T> = Reply<Result<T, PipelineError>>;

enum SessionCommand {
    Handle {
        input: String,
        reply: PipelineReply<AgentResponse>,
    },
    Process {
        input: String,
        reply: PipelineReply<ReasoningResult>,
    },
    MakeDecision {
        input: String,
        reply: PipelineReply<Decision>,
    },
    ExecuteDecision {
        decision: Box<Decision>,
        reply: PipelineReply<ExecutionResult>,
    },
    RecordInteraction {
        input: String,
        result: InteractionResult,
        feedback: Option<Feedback>,
        reply: PipelineReply<InteractionOutcome>,
    },
    PerformanceReport {
        reply: Reply<PerformanceReport>,
    },
    AddTurn {
        input: String,
        response: String,
        metadata: TurnMetadata,
        reply: PipelineReply<TurnId>,
    },
    UpsertPreference {
        category: String,
        value: serde_json::Value,
        confidence: f64,
        reply: Reply<()>,
    },
    UpdateSystemState {
        update: SystemStateUpdate,
        reply: Reply<()>,
    },
    AnalyzeBehavior {
        reply: Reply<BehaviorAnalysis>,
    },
    PurgeExpired {
        now: DateTime<Utc>,
        reply: Reply<usize>,
    },
}

/// Cloneable handle to an agent running on its session task.
#[derive(Clone)]
pub struct AgentHandle {
    sender: mpsc::Sender<SessionCommand>,
}

/// Move `agent` onto its own task. `capacity` bounds queued commands.
pub fn spawn(agent: Agent, capacity: usize) -> (AgentHandle, JoinHandle<Agent>) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let task = tokio::spawn(run(agent, receiver));
    (AgentHandle { sender }, task)
}

async fn run(mut agent: Agent, mut receiver: mpsc::Receiver<SessionCommand>) -> Agent {
    debug!("Agent session started");
    while let Some(command) = receiver.recv().await {
        // A dropped reply receiver only means the caller stopped waiting
        match command {
            SessionCommand::Handle { input, reply } => {
                let _ = reply.send(agent.handle(&input).await);
            }
            SessionCommand::Process { input, reply } => {
                let _ = reply.send(agent.process(&input).await);
            }
            SessionCommand::MakeDecision { input, reply } => {
                let _ = reply.send(agent.make_decision(&input).await);
            }
            SessionCommand::ExecuteDecision { decision, reply } => {
                let _ = reply.send(agent.execute_decision(&decision).await);
            }
            SessionCommand::RecordInteraction {
                input,
                result,
                feedback,
                reply,
            } => {
                let _ = reply.send(agent.record_interaction(&input, &result, feedback).await);
            }
            SessionCommand::PerformanceReport { reply } => {
                let _ = reply.send(agent.performance_report());
            }
            SessionCommand::AddTurn {
                input,
                response,
                metadata,
                reply,
            } => {
                let _ = reply.send(agent.add_turn(&input, &response, metadata).await);
            }
            SessionCommand::UpsertPreference {
                category,
                value,
                confidence,
                reply,
            } => {
                agent.upsert_preference(&category, value, confidence);
                let _ = reply.send(());
            }
            SessionCommand::UpdateSystemState { update, reply } => {
                agent.update_system_state(update);
                let _ = reply.send(());
            }
            SessionCommand::AnalyzeBehavior { reply } => {
                let _ = reply.send(agent.analyze_behavior());
            }
            SessionCommand::PurgeExpired { now, reply } => {
                let _ = reply.send(agent.purge_expired(now));
            }
        }
    }
    debug!("Agent session stopped");
    agent
}

impl AgentHandle {
    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> SessionCommand) -> Result<T, SessionError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(build(reply))
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)
    }

    pub async fn handle(&self, input: impl Into<String>) -> Result<AgentResponse, SessionError> {
        let input = input.into();
        Ok(self
            .request(|reply| SessionCommand::Handle { input, reply })
            .await??)
    }

    pub async fn process(&self, input: impl Into<String>) -> Result<ReasoningResult, SessionError> {
        let input = input.into();
        Ok(self
            .request(|reply| SessionCommand::Process { input, reply })
            .await??)
    }

    pub async fn make_decision(&self, input: impl Into<String>) -> Result<Decision, SessionError> {
        let input = input.into();
        Ok(self
            .request(|reply| SessionCommand::MakeDecision { input, reply })
            .await??)
    }

    pub async fn execute_decision(&self, decision: Decision) -> Result<ExecutionResult, SessionError> {
        Ok(self
            .request(|reply| SessionCommand::ExecuteDecision {
                decision: Box::new(decision),
                reply,
            })
            .await??)
    }

    pub async fn record_interaction(
        &self,
        input: impl Into<String>,
        result: InteractionResult,
        feedback: Option<Feedback>,
    ) -> Result<InteractionOutcome, SessionError> {
        let input = input.into();
        Ok(self
            .request(|reply| SessionCommand::RecordInteraction {
                input,
                result,
                feedback,
                reply,
            })
            .await??)
    }

    pub async fn performance_report(&self) -> Result<PerformanceReport, SessionError> {
        self.request(|reply| SessionCommand::PerformanceReport { reply })
            .await
    }

    pub async fn add_turn(
        &self,
        input: impl Into<String>,
        response: impl Into<String>,
        metadata: TurnMetadata,
    ) -> Result<TurnId, SessionError> {
        let (input, response) = (input.into(), response.into());
        Ok(self
            .request(|reply| SessionCommand::AddTurn {
                input,
                response,
                metadata,
                reply,
            })
            .await??)
    }

    pub async fn upsert_preference(
        &self,
        category: impl Into<String>,
        value: serde_json::Value,
        confidence: f64,
    ) -> Result<(), SessionError> {
        let category = category.into();
        self.request(|reply| SessionCommand::UpsertPreference {
            category,
            value,
            confidence,
            reply,
        })
        .await
    }

    pub async fn update_system_state(&self, update: SystemStateUpdate) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::UpdateSystemState { update, reply })
            .await
    }

    pub async fn analyze_behavior(&self) -> Result<BehaviorAnalysis, SessionError> {
        self.request(|reply| SessionCommand::AnalyzeBehavior { reply })
            .await
    }

    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, SessionError> {
        self.request(|reply| SessionCommand::PurgeExpired { now, reply })
            .await
    }

    /// False once the session task has stopped.
    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }
}
