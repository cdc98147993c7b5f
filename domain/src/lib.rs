//! Domain layer for interview-coach
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! An interview session asks a fixed, ordered list of questions. Each answer
//! moves the cursor forward by one; answering the last question completes
//! the session. Narration (intro, transitions, closing) is fixed at creation.
//!
//! ## Grading
//!
//! Answers are scored by blending three sub-scores: semantic similarity to a
//! reference answer, keyword coverage, and a rubric verdict from a language
//! model. Grading happens after submission; until then an answer is pending.

pub mod analytics;
pub mod core;
pub mod grading;
pub mod interview;
pub mod prompt;
pub mod question;
pub mod script;

// Re-export commonly used types
pub use analytics::rollup::{SessionHistoryEntry, TopicStats, session_history, topic_breakdown};
pub use core::error::DomainError;
pub use grading::{
    composite::{GradeReport, GradingWeights, SubScores},
    keyword::{DEFAULT_KEYWORD_THRESHOLD, KeywordCoverage, keyword_coverage},
    rubric::parse_rubric_score,
    similarity::{cosine_similarity, semantic_score},
};
pub use interview::{
    answer::{Answer, AnswerId, AnswerPatch, PLACEHOLDER_SCORE},
    narration::{NarrationBundle, compose_spoken_text},
    session::{Advance, CurrentSlot, Session, SessionId, SessionPatch, SessionStatus, UserId},
    summary::{AnswerSummary, SessionSummary},
};
pub use prompt::{DEFAULT_RUBRIC_ANCHORS, DEFAULT_RUBRIC_SYSTEM, InterviewPromptTemplate};
pub use question::{
    entities::{Difficulty, Question, QuestionFilter, QuestionId, TopicFilter},
    selection::{select_questions, topics_in_order},
};
pub use script::{
    negotiation::{Negotiation, NegotiationOutcome, NegotiationRequest, ScriptDraft},
    templates::template_bundle,
};
