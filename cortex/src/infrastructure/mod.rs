// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Infrastructure layer for Cortex bounded context
//!
//! In-process reference collaborators. Production deployments plug their own
//! encoder and classifier in behind the domain traits.

pub mod vocabulary_encoder;
pub mod keyword_classifier;

pub use vocabulary_encoder::VocabularyEncoder;
pub use keyword_classifier::KeywordIntentClassifier;
