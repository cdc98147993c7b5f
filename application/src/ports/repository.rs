//! Repository port
//!
//! Storage of questions, sessions and answers. The repository is the only
//! shared mutable state in the system.

use async_trait::async_trait;
use interview_domain::{
    Answer, AnswerId, AnswerPatch, Question, QuestionFilter, QuestionId, Session, SessionId,
    SessionPatch, UserId,
};
use thiserror::Error;

/// Errors returned by repository adapters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl RepositoryError {
    pub fn not_found(kind: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Persistence of interview data.
///
/// Contract for `update_session`: when `patch.expected_index` is set and
/// differs from the stored cursor, nothing is written and
/// [`RepositoryError::Conflict`] is returned. Patches that break session
/// invariants are rejected the same way.
///
/// Contract for `create_answer`: at most one answer per (session, question);
/// a duplicate is a [`RepositoryError::Conflict`].
///
/// Contract for `advance_session`: both checks above apply, and the session
/// patch and the answer are written together or not at all.
#[async_trait]
pub trait InterviewRepository: Send + Sync {
    async fn get_question(&self, id: QuestionId) -> Result<Question, RepositoryError>;

    async fn list_questions(&self, filter: &QuestionFilter)
    -> Result<Vec<Question>, RepositoryError>;

    async fn count_questions(&self, filter: &QuestionFilter) -> Result<usize, RepositoryError>;

    async fn create_session(&self, session: Session) -> Result<(), RepositoryError>;

    async fn get_session(&self, id: SessionId) -> Result<Session, RepositoryError>;

    /// Apply `patch` and return the updated session
    async fn update_session(
        &self,
        id: SessionId,
        patch: &SessionPatch,
    ) -> Result<Session, RepositoryError>;

    /// Move the session cursor and store the provisional answer in one write
    async fn advance_session(
        &self,
        id: SessionId,
        patch: &SessionPatch,
        answer: Answer,
    ) -> Result<Session, RepositoryError>;

    async fn list_sessions(&self, user: &UserId) -> Result<Vec<Session>, RepositoryError>;

    async fn create_answer(&self, answer: Answer) -> Result<(), RepositoryError>;

    async fn get_answer(&self, id: AnswerId) -> Result<Answer, RepositoryError>;

    /// Reconcile grading results and return the updated answer
    async fn update_answer(
        &self,
        id: AnswerId,
        patch: &AnswerPatch,
    ) -> Result<Answer, RepositoryError>;

    async fn list_answers(&self, session: SessionId) -> Result<Vec<Answer>, RepositoryError>;
}
