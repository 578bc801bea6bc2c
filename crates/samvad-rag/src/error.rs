//! Pipeline error taxonomy.
//!
//! The first four stages that can fail (validation, resolution, completion,
//! retrieval) are fatal and propagate to the caller unchanged. Audit write
//! failures are deliberately NOT represented here: the orchestrator swallows
//! them so they can never mask the original error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Malformed input, rejected before any external call.
    #[error("invalid input: {rule}")]
    Validation { rule: String },

    /// No active or default registry entry for the requested service.
    #[error("service resolution failed: {0}")]
    ServiceResolution(String),

    /// The completion gateway failed or returned no usable text.
    #[error("completion service error: {0}")]
    Completion(String),

    /// The retrieval gateway failed or returned no usable rows.
    #[error("retrieval error: {0}")]
    Retrieval(String),
}

impl PipelineError {
    pub(crate) fn validation(rule: impl Into<String>) -> Self {
        Self::Validation { rule: rule.into() }
    }

    pub(crate) fn completion(err: impl std::fmt::Display) -> Self {
        Self::Completion(err.to_string())
    }

    pub(crate) fn retrieval(err: impl std::fmt::Display) -> Self {
        Self::Retrieval(err.to_string())
    }
}
