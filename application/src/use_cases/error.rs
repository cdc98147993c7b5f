//! Errors surfaced by interview use cases

use crate::ports::repository::RepositoryError;
use crate::ports::speech::SpeechError;
use crate::ports::task_scheduler::ScheduleError;
use interview_domain::DomainError;
use thiserror::Error;

/// Errors that can occur while running an interview
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterviewError {
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unknown record, or a session the caller does not own
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Interview session is not active")]
    SessionNotActive,

    #[error("All questions have been answered")]
    AllQuestionsAnswered,

    #[error("Interview session is not completed yet")]
    SessionNotCompleted,

    #[error("Not enough questions: {available} available, {requested} requested")]
    InsufficientPool { available: usize, requested: usize },

    /// Lost a race with a concurrent update of the same session
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error("Scheduling failed: {0}")]
    Scheduling(#[from] ScheduleError),
}

impl InterviewError {
    /// Whether the caller can fix the request and try again
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            InterviewError::Repository(_) | InterviewError::Speech(_) | InterviewError::Scheduling(_)
        )
    }
}

impl From<DomainError> for InterviewError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InvalidInput(msg) => InterviewError::Validation(msg),
            DomainError::InsufficientPool {
                available,
                requested,
            } => InterviewError::InsufficientPool {
                available,
                requested,
            },
            DomainError::SessionNotActive => InterviewError::SessionNotActive,
            DomainError::AllQuestionsAnswered => InterviewError::AllQuestionsAnswered,
        }
    }
}

impl From<RepositoryError> for InterviewError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound { .. } => InterviewError::NotFound(error.to_string()),
            RepositoryError::Conflict(msg) => InterviewError::Conflict(msg),
            RepositoryError::Storage(msg) => InterviewError::Repository(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_domain_error() {
        assert_eq!(
            InterviewError::from(DomainError::SessionNotActive),
            InterviewError::SessionNotActive
        );
        assert_eq!(
            InterviewError::from(DomainError::InsufficientPool {
                available: 1,
                requested: 3
            }),
            InterviewError::InsufficientPool {
                available: 1,
                requested: 3
            }
        );
    }

    #[test]
    fn test_from_repository_error() {
        let err = InterviewError::from(RepositoryError::not_found("session", "abc"));
        assert_eq!(err, InterviewError::NotFound("session not found: abc".to_string()));
        assert!(err.is_client_error());

        let err = InterviewError::from(RepositoryError::Storage("disk full".to_string()));
        assert!(!err.is_client_error());
    }
}
