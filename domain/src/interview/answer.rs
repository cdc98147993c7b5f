//! Answer entity.
//!
//! An answer is created provisionally (score 0, empty feedback) on the
//! submission path and reconciled exactly once by background grading.

use super::session::SessionId;
use crate::core::error::DomainError;
use crate::question::entities::QuestionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Score stored on an answer that has not been graded yet.
pub const PLACEHOLDER_SCORE: u8 = 0;

/// Unique identifier of an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnswerId(Uuid);

impl AnswerId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for AnswerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A candidate's answer to one question of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub session_id: SessionId,
    pub question_id: QuestionId,
    pub transcript: String,
    /// 0–100, meaningful only when `graded` is set
    pub score: u8,
    pub feedback: String,
    pub matched_keywords: Vec<String>,
    pub graded: bool,
    pub created_at: DateTime<Utc>,
}

impl Answer {
    /// Provisional answer stored at submission time.
    pub fn provisional(
        session_id: SessionId,
        question_id: QuestionId,
        transcript: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AnswerId::generate(),
            session_id,
            question_id,
            transcript: transcript.into(),
            score: PLACEHOLDER_SCORE,
            feedback: String::new(),
            matched_keywords: Vec::new(),
            graded: false,
            created_at,
        }
    }

    /// Score for display; `None` while grading is still pending.
    pub fn final_score(&self) -> Option<u8> {
        self.graded.then_some(self.score)
    }

    /// Reconcile grading results into this answer.
    pub fn apply(&mut self, patch: &AnswerPatch) -> Result<(), DomainError> {
        if self.graded {
            return Err(DomainError::InvalidInput(format!(
                "answer {} has already been graded",
                self.id
            )));
        }
        if patch.score > 100 {
            return Err(DomainError::InvalidInput(format!(
                "score {} is outside 0-100",
                patch.score
            )));
        }
        self.score = patch.score;
        self.feedback = patch.feedback.clone();
        self.matched_keywords = patch.matched_keywords.clone();
        self.graded = true;
        Ok(())
    }
}

/// Grading results written back onto a provisional answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerPatch {
    pub score: u8,
    pub feedback: String,
    pub matched_keywords: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provisional() -> Answer {
        Answer::provisional(
            SessionId::generate(),
            QuestionId::new(3),
            "A stack is LIFO.",
            Utc::now(),
        )
    }

    #[test]
    fn test_provisional_is_pending() {
        let a = provisional();
        assert_eq!(a.score, PLACEHOLDER_SCORE);
        assert!(a.feedback.is_empty());
        assert!(a.matched_keywords.is_empty());
        assert!(!a.graded);
        assert_eq!(a.final_score(), None);
    }

    #[test]
    fn test_apply_grades_once() {
        let mut a = provisional();
        let patch = AnswerPatch {
            score: 82,
            feedback: "Good.".to_string(),
            matched_keywords: vec!["stack".to_string()],
        };
        a.apply(&patch).unwrap();
        assert_eq!(a.final_score(), Some(82));
        assert_eq!(a.matched_keywords, vec!["stack"]);

        assert!(a.apply(&patch).is_err());
    }

    #[test]
    fn test_apply_rejects_out_of_range_score() {
        let mut a = provisional();
        let patch = AnswerPatch {
            score: 101,
            feedback: String::new(),
            matched_keywords: vec![],
        };
        assert!(a.apply(&patch).is_err());
        assert!(!a.graded);
    }
}
