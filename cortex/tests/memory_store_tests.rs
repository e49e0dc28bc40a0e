// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use sentio_cortex::application::MemoryStore;
use sentio_cortex::domain::{cosine_similarity, CommandType, MemoryConfig, TextEncoder, TurnMetadata};
use sentio_cortex::infrastructure::VocabularyEncoder;
use std::sync::Arc;

const REQUESTS: &[&str] = &[
    "open the quarterly report",
    "open the quarterly report",
    "open the quarterly report now",
    "search the web for rust tutorials",
    "restart the network service",
    "open the quarterly report",
    "launch the music player",
];

#[tokio::test]
async fn relevant_turns_meet_threshold_in_descending_order() {
    let encoder = Arc::new(VocabularyEncoder::default());
    let mut memory = MemoryStore::new(encoder.clone(), MemoryConfig::default());
    for request in REQUESTS {
        memory
            .add_turn(request, "ok", TurnMetadata::succeeded(CommandType::File, 0.9, "open_file"))
            .await
            .unwrap();
    }

    let query = "open the quarterly report";
    let scored = memory.find_relevant_scored(query, 10).await.unwrap();
    assert!(scored.len() >= 3);
    assert!(scored.iter().all(|(_, similarity)| *similarity >= 0.7));
    assert!(scored.windows(2).all(|pair| pair[0].1 >= pair[1].1));

    // Similarities reported match the encoder
    let query_embedding = encoder.embed(query).await.unwrap();
    for (turn, similarity) in &scored {
        let expected = cosine_similarity(&query_embedding, &encoder.embed(&turn.input).await.unwrap());
        assert!((expected - similarity).abs() < 1e-9);
    }

    let limited = memory.find_relevant(query, 2).await.unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].id, scored[0].0.id);
}

#[tokio::test]
async fn history_keeps_most_recent_turns() {
    let config = MemoryConfig {
        max_history: 5,
        ..Default::default()
    };
    let mut memory = MemoryStore::new(Arc::new(VocabularyEncoder::new(32)), config);

    for i in 0..12 {
        memory
            .add_turn(&format!("request {i}"), "ok", TurnMetadata::default())
            .await
            .unwrap();
        assert!(memory.len() <= 5);
    }

    let inputs: Vec<&str> = memory.history().map(|t| t.input.as_str()).collect();
    assert_eq!(inputs, vec!["request 7", "request 8", "request 9", "request 10", "request 11"]);
}

#[tokio::test]
async fn behavior_analysis_over_real_history() {
    let mut memory = MemoryStore::new(Arc::new(VocabularyEncoder::new(32)), MemoryConfig::default());
    for request in REQUESTS {
        memory
            .add_turn(request, "ok", TurnMetadata::succeeded(CommandType::File, 0.9, "open_file"))
            .await
            .unwrap();
    }
    memory
        .add_turn("delete everything", "no", TurnMetadata::failed(None, "refused"))
        .await
        .unwrap();

    let behavior = memory.analyze_behavior();
    assert_eq!(behavior.common_patterns[0], "open the");
    assert_eq!(behavior.preferred_commands, vec!["open_file"]);
    assert_eq!(behavior.error_patterns, vec!["refused"]);
}
