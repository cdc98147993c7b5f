//! Port for structured exchange logging.
//!
//! Defines the [`ExchangeLogger`] trait for recording every language-model
//! exchange (rubric verdicts, feedback, script negotiation) to a structured
//! log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures what the model was
//! asked and what it answered. Candidate transcripts are never part of an
//! event; records carry the question and the model's reply only.

use interview_domain::SessionId;
use serde::Serialize;

/// One language-model exchange, tagged by kind when serialized
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExchangeEvent {
    /// Rubric verdict and the anchor it parsed to
    Rubric {
        question: String,
        reply: String,
        score: f64,
    },
    /// Rubric call that failed and scored 0
    RubricError { question: String, error: String },
    AnswerFeedback {
        question: String,
        score: u8,
        feedback: String,
    },
    SessionFeedback {
        session_id: SessionId,
        answers: usize,
        pending: usize,
        feedback: String,
    },
    /// One round of script negotiation (draft, review or revision)
    Script {
        stage: &'static str,
        prompt: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reply: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl ExchangeEvent {
    /// Short label: the serialized `type`, or the stage for script rounds
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rubric { .. } => "rubric",
            Self::RubricError { .. } => "rubric_error",
            Self::AnswerFeedback { .. } => "answer_feedback",
            Self::SessionFeedback { .. } => "session_feedback",
            Self::Script { stage, .. } => *stage,
        }
    }
}

/// Port for logging exchange events to a structured log.
///
/// `log` is synchronous and infallible; adapters drop records they cannot write.
pub trait ExchangeLogger: Send + Sync {
    fn log(&self, event: ExchangeEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoExchangeLogger;

impl ExchangeLogger for NoExchangeLogger {
    fn log(&self, _event: ExchangeEvent) {}
}
