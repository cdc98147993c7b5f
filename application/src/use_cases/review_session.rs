//! Review use cases: session summary, history and per-topic breakdown.

use super::error::InterviewError;
use crate::ports::repository::InterviewRepository;
use interview_domain::{
    Answer, Question, QuestionId, SessionHistoryEntry, SessionId, SessionSummary, TopicStats,
    UserId, session_history, topic_breakdown,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::warn;

pub struct ReviewSessionUseCase {
    repository: Arc<dyn InterviewRepository>,
}

impl ReviewSessionUseCase {
    pub fn new(repository: Arc<dyn InterviewRepository>) -> Self {
        Self { repository }
    }

    /// Summary of a completed session owned by `user`.
    pub async fn summary(
        &self,
        user: &UserId,
        session_id: SessionId,
    ) -> Result<SessionSummary, InterviewError> {
        let session = self.repository.get_session(session_id).await?;
        if !session.is_owned_by(user) {
            return Err(InterviewError::NotFound(format!("session not found: {}", session_id)));
        }
        if !session.status().is_terminal() {
            return Err(InterviewError::SessionNotCompleted);
        }

        let answers = self.repository.list_answers(session_id).await?;
        let questions = self.questions_for(&answers).await?;
        Ok(SessionSummary::build(&session, &answers, &questions))
    }

    /// All sessions of `user`, most recent first.
    pub async fn history(&self, user: &UserId) -> Result<Vec<SessionHistoryEntry>, InterviewError> {
        let sessions = self.repository.list_sessions(user).await?;
        let mut answers = Vec::new();
        for session in &sessions {
            answers.extend(self.repository.list_answers(session.id()).await?);
        }
        Ok(session_history(&sessions, &answers))
    }

    /// Graded answer statistics of `user` grouped by topic.
    pub async fn topic_breakdown(&self, user: &UserId) -> Result<Vec<TopicStats>, InterviewError> {
        let sessions = self.repository.list_sessions(user).await?;
        let mut answers = Vec::new();
        for session in &sessions {
            answers.extend(self.repository.list_answers(session.id()).await?);
        }
        let questions = self.questions_for(&answers).await?;
        Ok(topic_breakdown(&answers, &questions))
    }

    async fn questions_for(&self, answers: &[Answer]) -> Result<Vec<Question>, InterviewError> {
        let ids: BTreeSet<QuestionId> = answers.iter().map(|a| a.question_id).collect();
        let mut questions = Vec::with_capacity(ids.len());
        for id in ids {
            match self.repository.get_question(id).await {
                Ok(q) => questions.push(q),
                Err(crate::ports::repository::RepositoryError::NotFound { .. }) => {
                    warn!("Question {} referenced by an answer no longer exists", id);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(questions)
    }
}
