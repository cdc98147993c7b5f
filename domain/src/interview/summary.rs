//! Structured session summary.
//!
//! Used both as the read model returned to callers once a session is done and
//! as the input of the aggregate feedback prompt.

use super::answer::Answer;
use super::session::{Session, SessionId, SessionStatus};
use crate::question::entities::{Difficulty, Question, QuestionId, TopicFilter};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One answered question in a summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerSummary {
    pub question_id: QuestionId,
    pub topic: String,
    pub question_text: String,
    pub reference_answer: String,
    pub transcript: String,
    /// `None` while grading is pending
    pub score: Option<u8>,
    pub feedback: String,
    pub matched_keywords: Vec<String>,
    pub graded: bool,
}

/// Summary of a session and its answers, in question order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub topic: TopicFilter,
    pub difficulty: Difficulty,
    pub status: SessionStatus,
    pub question_count: usize,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub aggregate_feedback: Option<String>,
    pub answers: Vec<AnswerSummary>,
}

impl SessionSummary {
    /// Build a summary from stored records.
    ///
    /// Answers are ordered by the position of their question in the session.
    /// Answers whose question is missing from `questions` keep empty text fields.
    pub fn build(session: &Session, answers: &[Answer], questions: &[Question]) -> Self {
        let order = session.question_ids();
        let mut ordered: Vec<&Answer> = answers
            .iter()
            .filter(|a| a.session_id == session.id())
            .collect();
        ordered.sort_by_key(|a| {
            order
                .iter()
                .position(|id| *id == a.question_id)
                .unwrap_or(usize::MAX)
        });

        let rows = ordered
            .into_iter()
            .map(|answer| {
                let question = questions.iter().find(|q| q.id == answer.question_id);
                AnswerSummary {
                    question_id: answer.question_id,
                    topic: question.map(|q| q.topic.clone()).unwrap_or_default(),
                    question_text: question.map(|q| q.text.clone()).unwrap_or_default(),
                    reference_answer: question
                        .map(|q| q.reference_answer.clone())
                        .unwrap_or_default(),
                    transcript: answer.transcript.clone(),
                    score: answer.final_score(),
                    feedback: answer.feedback.clone(),
                    matched_keywords: answer.matched_keywords.clone(),
                    graded: answer.graded,
                }
            })
            .collect();

        Self {
            session_id: session.id(),
            topic: session.topic().clone(),
            difficulty: session.difficulty(),
            status: session.status(),
            question_count: session.question_count(),
            started_at: session.started_at(),
            ended_at: session.ended_at(),
            aggregate_feedback: session.aggregate_feedback().map(str::to_string),
            answers: rows,
        }
    }

    /// Mean score over graded answers
    pub fn average_score(&self) -> Option<f64> {
        let scores: Vec<u8> = self.answers.iter().filter_map(|a| a.score).collect();
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().map(|s| *s as f64).sum::<f64>() / scores.len() as f64)
    }

    pub fn pending_count(&self) -> usize {
        self.answers.iter().filter(|a| !a.graded).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::answer::AnswerPatch;
    use crate::interview::narration::NarrationBundle;
    use crate::interview::session::UserId;

    fn fixture() -> (Session, Vec<Question>) {
        let questions = vec![
            Question::new(1, "Databases", Difficulty::Junior, "What is an index?", "A lookup structure."),
            Question::new(2, "Networking", Difficulty::Junior, "What is TCP?", "A reliable transport."),
        ];
        let session = Session::start(
            UserId::new("u"),
            TopicFilter::Mixed,
            Difficulty::Junior,
            vec![QuestionId::new(2), QuestionId::new(1)],
            NarrationBundle::new("Hi.", vec!["Next.".to_string()], "Bye."),
            Utc::now(),
        )
        .unwrap();
        (session, questions)
    }

    #[test]
    fn test_build_orders_by_session_question_order() {
        let (session, questions) = fixture();
        let first = Answer::provisional(session.id(), QuestionId::new(1), "An index...", Utc::now());
        let second = Answer::provisional(session.id(), QuestionId::new(2), "TCP is...", Utc::now());

        let summary = SessionSummary::build(&session, &[first, second], &questions);
        assert_eq!(summary.answers.len(), 2);
        assert_eq!(summary.answers[0].question_id, QuestionId::new(2));
        assert_eq!(summary.answers[0].topic, "Networking");
        assert_eq!(summary.answers[1].reference_answer, "A lookup structure.");
    }

    #[test]
    fn test_pending_answers_are_not_zero() {
        let (session, questions) = fixture();
        let mut graded = Answer::provisional(session.id(), QuestionId::new(2), "TCP", Utc::now());
        graded
            .apply(&AnswerPatch {
                score: 80,
                feedback: "Good".to_string(),
                matched_keywords: vec![],
            })
            .unwrap();
        let pending = Answer::provisional(session.id(), QuestionId::new(1), "idx", Utc::now());

        let summary = SessionSummary::build(&session, &[graded, pending], &questions);
        assert_eq!(summary.answers[1].score, None);
        assert_eq!(summary.pending_count(), 1);
        assert_eq!(summary.average_score(), Some(80.0));
    }

    #[test]
    fn test_average_score_none_without_graded_answers() {
        let (session, questions) = fixture();
        let summary = SessionSummary::build(&session, &[], &questions);
        assert_eq!(summary.average_score(), None);
        assert_eq!(summary.pending_count(), 0);
    }
}
