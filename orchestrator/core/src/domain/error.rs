// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use sentio_cortex::domain::{ClassifierError, CortexError, EncoderError};
use thiserror::Error;

/// Failures of the reasoning / decision pipeline.
///
/// Confidence gates are not errors; only collaborator failures land here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Intent classifier failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Text encoder failed: {0}")]
    Encoder(#[from] EncoderError),

    #[error("Cortex operation failed: {0}")]
    Cortex(CortexError),

    #[error("Action plan is empty")]
    EmptyPlan,
}

impl From<CortexError> for PipelineError {
    fn from(err: CortexError) -> Self {
        match err {
            CortexError::Classifier(e) => PipelineError::Classifier(e),
            CortexError::Encoder(e) => PipelineError::Encoder(e),
            other => PipelineError::Cortex(other),
        }
    }
}

/// Failures talking to an agent session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Agent session closed")]
    Closed,

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cortex_errors_unwrap_collaborator_failures() {
        let err: PipelineError = CortexError::Classifier(ClassifierError::NotInitialized).into();
        assert!(matches!(err, PipelineError::Classifier(ClassifierError::NotInitialized)));

        let err: PipelineError = CortexError::InvalidMetadata("bad".to_string()).into();
        assert!(matches!(err, PipelineError::Cortex(_)));
    }
}
