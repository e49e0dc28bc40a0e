// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use thiserror::Error;

use super::embedding::EncoderError;
use super::intent::ClassifierError;

/// Errors surfaced by the Cortex application services.
///
/// Collaborator failures pass through unchanged.
#[derive(Debug, Error)]
pub enum CortexError {
    #[error(transparent)]
    Encoder(#[from] EncoderError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("Invalid turn metadata: {0}")]
    InvalidMetadata(String),
}
