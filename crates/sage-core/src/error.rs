// Error types for the tutoring core

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for tutoring operations
pub type Result<T> = std::result::Result<T, SageError>;

/// Errors that can occur while driving a tutoring session
#[derive(Debug, Error)]
pub enum SageError {
    /// Referenced session does not exist
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    /// Operation forbidden by the session's current status
    #[error("Invalid session state: {0}")]
    InvalidState(String),

    /// Request rejected before any state was created
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Plan generation produced unparsable or schema-invalid output
    #[error("Plan generation failed: {0}")]
    PlanGeneration(String),

    /// LLM transport error (timeout, API failure); the turn is retryable
    #[error("LLM error: {0}")]
    Llm(String),

    /// Session store error
    #[error("Session store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl SageError {
    /// Create an invalid-state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        SageError::InvalidState(msg.into())
    }

    /// Create an invalid-input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        SageError::InvalidInput(msg.into())
    }

    /// Create a plan generation error
    pub fn plan(msg: impl Into<String>) -> Self {
        SageError::PlanGeneration(msg.into())
    }

    /// Create an LLM error
    pub fn llm(msg: impl Into<String>) -> Self {
        SageError::Llm(msg.into())
    }

    /// Create a session store error
    pub fn store(msg: impl Into<String>) -> Self {
        SageError::Store(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        SageError::Configuration(msg.into())
    }

    /// Create a session not found error
    pub fn session_not_found(session_id: Uuid) -> Self {
        SageError::SessionNotFound(session_id)
    }

    /// True when retrying the same call without changing state may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, SageError::Llm(_) | SageError::Store(_))
    }
}
