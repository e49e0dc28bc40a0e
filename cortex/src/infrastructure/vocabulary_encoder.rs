// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Vocabulary Encoder
//!
//! In-process `TextEncoder`: each token maps to a pseudo-random unit-scale
//! vector derived from its hash, and a text's embedding is the mean of its
//! token vectors. Texts sharing most tokens land close together, which is all
//! the memory store's similarity search needs.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Implements the `TextEncoder` port without a model server

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::domain::{tokenize, EncoderError, TextEncoder};

/// Default embedding width.
pub const DEFAULT_DIMENSION: usize = 256;

/// Longest token sequence considered per text.
pub const MAX_TOKENS: usize = 128;

pub struct VocabularyEncoder {
    dimension: usize,
    /// Token vectors computed so far
    vocabulary: RwLock<HashMap<String, Vec<f32>>>,
}

impl VocabularyEncoder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            vocabulary: RwLock::new(HashMap::new()),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.read().len()
    }

    fn token_vector(&self, token: &str) -> Vec<f32> {
        if let Some(v) = self.vocabulary.read().get(token) {
            return v.clone();
        }

        let vector: Vec<f32> = (0..self.dimension)
            .map(|i| {
                let mut hasher = DefaultHasher::new();
                token.hash(&mut hasher);
                i.hash(&mut hasher);
                // map the hash onto [-1, 1]
                (hasher.finish() as f64 / u64::MAX as f64 * 2.0 - 1.0) as f32
            })
            .collect();

        self.vocabulary.write().insert(token.to_string(), vector.clone());
        vector
    }
}

impl Default for VocabularyEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl TextEncoder for VocabularyEncoder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EncoderError> {
        let tokens = tokenize(text);
        let mut pooled = vec![0.0f32; self.dimension];
        if tokens.is_empty() {
            return Ok(pooled);
        }

        let used = tokens.len().min(MAX_TOKENS);
        for token in tokens.iter().take(MAX_TOKENS) {
            let vector = self.token_vector(token);
            if vector.len() != self.dimension {
                return Err(EncoderError::DimensionMismatch {
                    expected: self.dimension,
                    actual: vector.len(),
                });
            }
            for (acc, v) in pooled.iter_mut().zip(vector) {
                *acc += v;
            }
        }

        for value in pooled.iter_mut() {
            *value /= used as f32;
        }
        Ok(pooled)
    }
}
