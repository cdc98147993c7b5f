//! Background task scheduling port

use interview_domain::{AnswerId, QuestionId, SessionId};
use thiserror::Error;

/// Work handed off the submission path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundTask {
    /// Grade one answer and write back score, feedback and keyword hits
    GradeAnswer {
        session_id: SessionId,
        answer_id: AnswerId,
        question_id: QuestionId,
        transcript: String,
    },
    /// Write aggregate feedback for a completed session
    SummarizeSession { session_id: SessionId },
}

impl BackgroundTask {
    pub fn label(&self) -> &'static str {
        match self {
            BackgroundTask::GradeAnswer { .. } => "grade_answer",
            BackgroundTask::SummarizeSession { .. } => "summarize_session",
        }
    }

    pub fn session_id(&self) -> SessionId {
        match self {
            BackgroundTask::GradeAnswer { session_id, .. }
            | BackgroundTask::SummarizeSession { session_id } => *session_id,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Background queue is closed")]
    QueueClosed,

    #[error("Background queue is full")]
    QueueFull,
}

/// Accepts background tasks without waiting for them to run.
pub trait TaskScheduler: Send + Sync {
    fn schedule(&self, task: BackgroundTask) -> Result<(), ScheduleError>;
}
