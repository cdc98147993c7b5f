//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not enough questions: {available} available, {requested} requested")]
    InsufficientPool { available: usize, requested: usize },

    #[error("Interview session is not active")]
    SessionNotActive,

    #[error("All questions have been answered")]
    AllQuestionsAnswered,
}

impl DomainError {
    /// Check if this error is a state machine precondition violation
    pub fn is_state_violation(&self) -> bool {
        matches!(
            self,
            DomainError::SessionNotActive | DomainError::AllQuestionsAnswered
        )
    }
}
