//! Question bank entities and value objects

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier of a question in the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(u64);

impl QuestionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for QuestionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Difficulty tier of a question and of the session that asks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Junior,
    Mid,
    Senior,
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Junior => "Junior",
            Difficulty::Mid => "Mid",
            Difficulty::Senior => "Senior",
        }
    }

    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Junior, Difficulty::Mid, Difficulty::Senior]
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "junior" => Ok(Difficulty::Junior),
            "mid" | "intermediate" => Ok(Difficulty::Mid),
            "senior" => Ok(Difficulty::Senior),
            other => Err(DomainError::InvalidInput(format!(
                "unknown difficulty '{}'",
                other
            ))),
        }
    }
}

/// Topic selection for a session: one concrete topic or a mix of all topics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TopicFilter {
    Mixed,
    Topic(String),
}

impl TopicFilter {
    /// Sentinel name accepted for the mixed mode.
    pub const MIXED: &'static str = "Mixed";

    pub fn is_mixed(&self) -> bool {
        matches!(self, TopicFilter::Mixed)
    }

    /// The concrete topic, if any
    pub fn topic(&self) -> Option<&str> {
        match self {
            TopicFilter::Mixed => None,
            TopicFilter::Topic(t) => Some(t),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TopicFilter::Mixed => Self::MIXED,
            TopicFilter::Topic(t) => t,
        }
    }
}

impl std::fmt::Display for TopicFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TopicFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidInput("topic cannot be empty".to_string()));
        }
        if trimmed.eq_ignore_ascii_case(Self::MIXED) {
            Ok(TopicFilter::Mixed)
        } else {
            Ok(TopicFilter::Topic(trimmed.to_string()))
        }
    }
}

/// An interview question (Entity, immutable once created)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub topic: String,
    pub difficulty: Difficulty,
    /// Prompt read to the candidate
    pub text: String,
    pub reference_answer: String,
    /// Grading keywords, in authoring order
    pub keywords: Vec<String>,
}

impl Question {
    pub fn new(
        id: impl Into<QuestionId>,
        topic: impl Into<String>,
        difficulty: Difficulty,
        text: impl Into<String>,
        reference_answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
            difficulty,
            text: text.into(),
            reference_answer: reference_answer.into(),
            keywords: Vec::new(),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

/// Filter used when listing candidate questions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionFilter {
    pub difficulty: Option<Difficulty>,
    pub topic: Option<String>,
}

impl QuestionFilter {
    /// Candidate pool for a session: difficulty always, topic unless mixed
    pub fn for_session(difficulty: Difficulty, topic: &TopicFilter) -> Self {
        Self {
            difficulty: Some(difficulty),
            topic: topic.topic().map(str::to_string),
        }
    }

    pub fn matches(&self, question: &Question) -> bool {
        self.difficulty.is_none_or(|d| d == question.difficulty)
            && self.topic.as_deref().is_none_or(|t| t == question.topic)
    }
}
