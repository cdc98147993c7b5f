//! Read-only rollups over stored sessions and answers.
//!
//! Averages only include graded answers; pending answers count as answered
//! but never as a zero score.

use crate::interview::answer::Answer;
use crate::interview::session::{Session, SessionId, SessionStatus};
use crate::question::entities::{Difficulty, Question, TopicFilter};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of a user's session history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionHistoryEntry {
    pub session_id: SessionId,
    pub topic: TopicFilter,
    pub difficulty: Difficulty,
    pub status: SessionStatus,
    pub question_count: usize,
    pub answered_count: usize,
    pub average_score: Option<f64>,
    pub has_aggregate_feedback: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Per-topic statistics over graded answers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicStats {
    pub topic: String,
    pub answers_count: usize,
    pub average_score: f64,
}

fn mean(scores: impl Iterator<Item = u8>) -> Option<f64> {
    let (sum, n) = scores.fold((0u64, 0usize), |(sum, n), s| (sum + s as u64, n + 1));
    (n > 0).then(|| sum as f64 / n as f64)
}

/// History rows for `sessions`, most recent first.
pub fn session_history(sessions: &[Session], answers: &[Answer]) -> Vec<SessionHistoryEntry> {
    let mut rows: Vec<SessionHistoryEntry> = sessions
        .iter()
        .map(|session| {
            let own: Vec<&Answer> = answers
                .iter()
                .filter(|a| a.session_id == session.id())
                .collect();
            SessionHistoryEntry {
                session_id: session.id(),
                topic: session.topic().clone(),
                difficulty: session.difficulty(),
                status: session.status(),
                question_count: session.question_count(),
                answered_count: own.len(),
                average_score: mean(own.iter().filter_map(|a| a.final_score())),
                has_aggregate_feedback: session.aggregate_feedback().is_some(),
                started_at: session.started_at(),
                ended_at: session.ended_at(),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.started_at.cmp(&a.started_at));
    rows
}

/// Graded answer counts and average scores per topic, sorted by topic.
///
/// Answers whose question is unknown are skipped.
pub fn topic_breakdown(answers: &[Answer], questions: &[Question]) -> Vec<TopicStats> {
    let mut by_topic: BTreeMap<&str, Vec<u8>> = BTreeMap::new();
    for answer in answers {
        let Some(score) = answer.final_score() else {
            continue;
        };
        if let Some(question) = questions.iter().find(|q| q.id == answer.question_id) {
            by_topic.entry(question.topic.as_str()).or_default().push(score);
        }
    }

    by_topic
        .into_iter()
        .filter_map(|(topic, scores)| {
            let count = scores.len();
            mean(scores.into_iter()).map(|average_score| TopicStats {
                topic: topic.to_string(),
                answers_count: count,
                average_score,
            })
        })
        .collect()
}
