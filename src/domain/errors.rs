//! Domain errors for the ragloom service.

use thiserror::Error;

/// Domain-level errors that can occur in ragloom.
///
/// Tool failures are deliberately absent: they are values
/// ([`ToolOutcome::Error`](crate::domain::models::ToolOutcome)) that travel back
/// into the conversation, never errors that abort a request. An empty RAG
/// context is not an error either; the pipeline answers with a fixed fallback.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    /// Malformed caller input (empty text, zero `k`, bad template variables).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// An embedding does not match the dimensionality already fixed by the store.
    #[error("Embedding dimension mismatch: store holds {expected}-dimensional vectors, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The chat or embedding provider failed. Propagated as-is, never retried.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The model kept requesting tools past the configured number of rounds.
    #[error("Tool loop exceeded {0} rounds without a final answer")]
    ToolLoopExceeded(usize),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl DomainError {
    /// Returns true for errors caused by the caller's input.
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed(_) | Self::DimensionMismatch { .. }
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Provider(format!("Serialization error: {err}"))
    }
}
