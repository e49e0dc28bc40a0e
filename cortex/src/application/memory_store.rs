// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Memory Store
//!
//! Bounded conversational history with similarity retrieval, a preference
//! table and the latest host snapshot.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Perception side of the feedback loop

use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{
    cosine_similarity, BehaviorAnalysis, ContextSummary, ConversationTurn, CortexError,
    MemoryConfig, SystemState, SystemStateUpdate, TextEncoder, TurnId, TurnMetadata,
    UserPreference,
};

/// Owns one agent's conversational memory.
///
/// Mutation goes through `&mut self`; callers that share a store across tasks
/// serialize access themselves.
pub struct MemoryStore {
    encoder: Arc<dyn TextEncoder>,
    config: MemoryConfig,
    history: VecDeque<ConversationTurn>,
    preferences: BTreeMap<String, UserPreference>,
    system_state: SystemState,
}

impl MemoryStore {
    pub fn new(encoder: Arc<dyn TextEncoder>, config: MemoryConfig) -> Self {
        Self {
            encoder,
            history: VecDeque::with_capacity(config.max_history),
            config,
            preferences: BTreeMap::new(),
            system_state: SystemState::default(),
        }
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Store a turn stamped with the current time.
    pub async fn add_turn(
        &mut self,
        input: &str,
        response: &str,
        metadata: TurnMetadata,
    ) -> Result<TurnId, CortexError> {
        self.add_turn_at(input, response, metadata, Utc::now()).await
    }

    /// Store a turn with an explicit timestamp (history import, replay).
    pub async fn add_turn_at(
        &mut self,
        input: &str,
        response: &str,
        metadata: TurnMetadata,
        timestamp: DateTime<Utc>,
    ) -> Result<TurnId, CortexError> {
        metadata.validate()?;
        let embedding = self.encoder.embed(input).await?;

        let id = TurnId::new();
        self.history.push_back(ConversationTurn {
            id,
            timestamp,
            input: input.to_string(),
            response: response.to_string(),
            embedding,
            metadata,
        });

        let mut evicted = 0usize;
        while self.history.len() > self.config.max_history {
            self.history.pop_front();
            evicted += 1;
        }

        debug!(turn_id = %id, history_len = self.history.len(), evicted, "Stored conversation turn");
        Ok(id)
    }

    /// Turns whose similarity to `query` reaches the relevance threshold,
    /// most similar first, at most `limit`.
    pub async fn find_relevant(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, CortexError> {
        Ok(self
            .find_relevant_scored(query, limit)
            .await?
            .into_iter()
            .map(|(turn, _)| turn)
            .collect())
    }

    /// Like [`MemoryStore::find_relevant`], paired with each similarity.
    pub async fn find_relevant_scored(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<(ConversationTurn, f64)>, CortexError> {
        let query_embedding = self.encoder.embed(query).await?;

        let mut scored: Vec<(usize, f64)> = self
            .history
            .iter()
            .enumerate()
            .map(|(idx, turn)| (idx, cosine_similarity(&query_embedding, &turn.embedding)))
            .filter(|(_, similarity)| *similarity >= self.config.relevance_threshold)
            .collect();

        // sort_by is stable, so equal scores keep insertion order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(limit);

        debug!(candidates = self.history.len(), relevant = scored.len(), "Similarity search complete");

        Ok(scored
            .into_iter()
            .map(|(idx, similarity)| (self.history[idx].clone(), similarity))
            .collect())
    }

    /// Insert or replace the preference for `category` (last write wins).
    pub fn upsert_preference(
        &mut self,
        category: impl Into<String>,
        value: serde_json::Value,
        confidence: f64,
    ) {
        let category = category.into();
        let now = Utc::now();
        let confidence = confidence.clamp(0.0, 1.0);

        match self.preferences.get_mut(&category) {
            Some(existing) => {
                existing.value = value;
                existing.confidence = confidence;
                existing.last_updated = now;
            }
            None => {
                self.preferences.insert(
                    category.clone(),
                    UserPreference {
                        id: Uuid::new_v4(),
                        category,
                        value,
                        confidence,
                        last_updated: now,
                    },
                );
            }
        }
    }

    pub fn preference(&self, category: &str) -> Option<&UserPreference> {
        self.preferences.get(category)
    }

    pub fn preferences(&self) -> impl Iterator<Item = &UserPreference> {
        self.preferences.values()
    }

    pub fn update_system_state(&mut self, update: SystemStateUpdate) {
        self.system_state.apply(update);
        debug!(
            cpu = self.system_state.resource_usage.cpu,
            memory = self.system_state.resource_usage.memory,
            has_error = self.system_state.last_error.is_some(),
            "System state updated"
        );
    }

    pub fn system_state(&self) -> &SystemState {
        &self.system_state
    }

    /// Relevant history for `query` plus all preferences and the current
    /// system state.
    pub async fn summarize(&self, query: &str) -> Result<ContextSummary, CortexError> {
        let relevant_history = self.find_relevant(query, self.config.relevant_limit).await?;
        Ok(ContextSummary {
            relevant_history,
            preferences: self.preferences.values().cloned().collect(),
            system_state: self.system_state.clone(),
        })
    }

    pub fn analyze_behavior(&self) -> BehaviorAnalysis {
        let mut bigrams = FrequencyTable::default();
        let mut commands = FrequencyTable::default();
        let mut errors = FrequencyTable::default();

        for turn in &self.history {
            let words: Vec<String> = turn
                .input
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect();
            for pair in words.windows(2) {
                bigrams.add(format!("{} {}", pair[0], pair[1]));
            }
            for command in &turn.metadata.executed_commands {
                commands.add(command.clone());
            }
            if let Some(error) = &turn.metadata.error {
                errors.add(error.clone());
            }
        }

        BehaviorAnalysis {
            common_patterns: bigrams.top(self.config.common_pattern_limit),
            preferred_commands: commands.top(self.config.preferred_command_limit),
            error_patterns: errors.top(self.config.error_pattern_limit),
        }
    }

    /// Drop turns older than the retention period. Returns how many went.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::days(self.config.retention_days);
        let before = self.history.len();
        self.history.retain(|turn| turn.timestamp >= cutoff);
        let removed = before - self.history.len();

        if removed > 0 {
            info!(removed, retention_days = self.config.retention_days, "Purged expired turns");
        }
        removed
    }

    /// Turns marked successful that carry a known intent.
    pub fn successful_turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.history
            .iter()
            .filter(|turn| turn.metadata.is_successful() && turn.metadata.intent.is_some())
    }

    /// Oldest first.
    pub fn history(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

/// Counts keys while remembering first-seen order for tie-breaking.
#[derive(Default)]
struct FrequencyTable {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl FrequencyTable {
    fn add(&mut self, key: String) {
        match self.counts.get_mut(&key) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(key.clone(), 1);
                self.order.push(key);
            }
        }
    }

    fn top(self, n: usize) -> Vec<String> {
        let counts = self.counts;
        let mut ranked: Vec<(String, usize)> = self
            .order
            .into_iter()
            .map(|key| {
                let count = counts.get(&key).copied().unwrap_or(0);
                (key, count)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().take(n).map(|(key, _)| key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CommandType, EncoderError, ResourceUsage, SystemError};
    use async_trait::async_trait;

    /// Maps each known text to a fixed vector; anything else is the zero vector.
    struct TableEncoder {
        table: Vec<(&'static str, Vec<f32>)>,
        calls: Arc<tokio::sync::Mutex<usize>>,
    }

    impl TableEncoder {
        fn new(table: Vec<(&'static str, Vec<f32>)>) -> Self {
            Self {
                table,
                calls: Arc::new(tokio::sync::Mutex::new(0)),
            }
        }
    }

    #[async_trait]
    impl TextEncoder for TableEncoder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EncoderError> {
            *self.calls.lock().await += 1;
            Ok(self
                .table
                .iter()
                .find(|(key, _)| *key == text)
                .map(|(_, v)| v.clone())
                .unwrap_or_else(|| vec![0.0, 0.0, 0.0]))
        }
    }

    struct FailingEncoder;

    #[async_trait]
    impl TextEncoder for FailingEncoder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EncoderError> {
            Err(EncoderError::Unavailable("offline".to_string()))
        }
    }

    fn store_with(table: Vec<(&'static str, Vec<f32>)>) -> MemoryStore {
        MemoryStore::new(Arc::new(TableEncoder::new(table)), MemoryConfig::default())
    }

    #[tokio::test]
    async fn test_find_relevant_filters_and_orders() {
        let mut store = store_with(vec![
            ("query", vec![1.0, 0.0, 0.0]),
            ("close", vec![0.9, 0.1, 0.0]),
            ("closer", vec![0.99, 0.01, 0.0]),
            ("far", vec![0.0, 1.0, 0.0]),
        ]);
        for input in ["close", "far", "closer"] {
            store.add_turn(input, "ok", TurnMetadata::default()).await.unwrap();
        }

        let scored = store.find_relevant_scored("query", 5).await.unwrap();
        let inputs: Vec<&str> = scored.iter().map(|(t, _)| t.input.as_str()).collect();
        assert_eq!(inputs, vec!["closer", "close"]);
        assert!(scored.iter().all(|(_, s)| *s >= 0.7));
        assert!(scored[0].1 > scored[1].1);

        let limited = store.find_relevant("query", 1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].input, "closer");
    }

    #[tokio::test]
    async fn test_find_relevant_ties_keep_insertion_order() {
        let mut store = store_with(vec![("query", vec![1.0, 0.0, 0.0]), ("same", vec![1.0, 0.0, 0.0])]);
        let first = store.add_turn("same", "one", TurnMetadata::default()).await.unwrap();
        let second = store.add_turn("same", "two", TurnMetadata::default()).await.unwrap();

        let relevant = store.find_relevant("query", 5).await.unwrap();
        assert_eq!(relevant.iter().map(|t| t.id).collect::<Vec<_>>(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_empty_store_returns_nothing() {
        let store = store_with(vec![]);
        assert!(store.find_relevant("anything", 5).await.unwrap().is_empty());
        let summary = store.summarize("anything").await.unwrap();
        assert!(summary.relevant_history.is_empty());
        assert!(summary.preferences.is_empty());
    }

    #[tokio::test]
    async fn test_history_is_bounded_and_keeps_most_recent() {
        let config = MemoryConfig {
            max_history: 3,
            ..Default::default()
        };
        let mut store = MemoryStore::new(Arc::new(TableEncoder::new(vec![])), config);
        for i in 0..5 {
            store
                .add_turn(&format!("turn {i}"), "ok", TurnMetadata::default())
                .await
                .unwrap();
        }

        let inputs: Vec<&str> = store.history().map(|t| t.input.as_str()).collect();
        assert_eq!(inputs, vec!["turn 2", "turn 3", "turn 4"]);
    }

    #[tokio::test]
    async fn test_encoder_failure_propagates() {
        let mut store = MemoryStore::new(Arc::new(FailingEncoder), MemoryConfig::default());
        let err = store.add_turn("hi", "hello", TurnMetadata::default()).await.unwrap_err();
        assert!(matches!(err, CortexError::Encoder(EncoderError::Unavailable(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_metadata_is_rejected_before_embedding() {
        let encoder = Arc::new(TableEncoder::new(vec![]));
        let calls = encoder.calls.clone();
        let mut store = MemoryStore::new(encoder, MemoryConfig::default());
        let meta = TurnMetadata {
            confidence: Some(-0.1),
            ..Default::default()
        };

        assert!(store.add_turn("hi", "hello", meta).await.is_err());
        assert_eq!(*calls.lock().await, 0);
    }

    #[tokio::test]
    async fn test_preferences_last_write_wins() {
        let mut store = store_with(vec![]);
        store.upsert_preference("file_editor", serde_json::json!("vim"), 0.6);
        let id = store.preference("file_editor").unwrap().id;
        store.upsert_preference("file_editor", serde_json::json!("helix"), 1.0);

        let pref = store.preference("file_editor").unwrap();
        assert_eq!(pref.id, id);
        assert_eq!(pref.value, serde_json::json!("helix"));
        assert_eq!(pref.confidence, 1.0);
        assert_eq!(store.preferences().count(), 1);
    }

    #[tokio::test]
    async fn test_system_state_flows_into_summary() {
        let mut store = store_with(vec![]);
        store.update_system_state(SystemStateUpdate {
            resource_usage: Some(ResourceUsage { cpu: 0.5, memory: 0.4 }),
            last_error: Some(Some(SystemError::new("permission denied"))),
            ..Default::default()
        });

        let summary = store.summarize("status").await.unwrap();
        assert_eq!(summary.system_state.resource_usage.cpu, 0.5);
        assert_eq!(
            summary.system_state.last_error.map(|e| e.message),
            Some("permission denied".to_string())
        );
    }

    #[tokio::test]
    async fn test_analyze_behavior_counts_with_first_seen_ties() {
        let mut store = store_with(vec![]);
        store
            .add_turn("Open the file", "ok", TurnMetadata::succeeded(CommandType::File, 0.9, "open_file"))
            .await
            .unwrap();
        store
            .add_turn("open the browser", "ok", TurnMetadata::succeeded(CommandType::Web, 0.9, "open_url"))
            .await
            .unwrap();
        store
            .add_turn("open the file", "fail", TurnMetadata::failed(Some(CommandType::File), "not found"))
            .await
            .unwrap();

        let analysis = store.analyze_behavior();
        assert_eq!(analysis.common_patterns[0], "open the");
        assert_eq!(analysis.common_patterns[1], "the file");
        assert_eq!(analysis.common_patterns[2], "the browser");
        assert_eq!(analysis.preferred_commands, vec!["open_file", "open_url"]);
        assert_eq!(analysis.error_patterns, vec!["not found"]);
    }

    #[tokio::test]
    async fn test_purge_expired_drops_old_turns() {
        let mut store = store_with(vec![]);
        let now = Utc::now();
        store
            .add_turn_at("old", "ok", TurnMetadata::default(), now - Duration::days(8))
            .await
            .unwrap();
        store
            .add_turn_at("recent", "ok", TurnMetadata::default(), now - Duration::days(1))
            .await
            .unwrap();

        assert_eq!(store.purge_expired(now), 1);
        assert_eq!(store.history().next().map(|t| t.input.as_str()), Some("recent"));
        assert_eq!(store.purge_expired(now), 0);
    }

    #[tokio::test]
    async fn test_successful_turns_require_intent() {
        let mut store = store_with(vec![]);
        store
            .add_turn("launch app", "ok", TurnMetadata::succeeded(CommandType::App, 0.9, "launch_app"))
            .await
            .unwrap();
        store
            .add_turn(
                "hmm",
                "ok",
                TurnMetadata {
                    success: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store
            .add_turn("broken", "no", TurnMetadata::failed(Some(CommandType::File), "boom"))
            .await
            .unwrap();

        let inputs: Vec<&str> = store.successful_turns().map(|t| t.input.as_str()).collect();
        assert_eq!(inputs, vec!["launch app"]);
    }
}
