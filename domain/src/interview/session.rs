//! Interview session entity and its state machine.
//!
//! ```text
//! in_progress ──advance (index reaches count)──▶ completed
//! ```
//!
//! The question list and narration are fixed at creation. Only the cursor,
//! status, end time and aggregate feedback change afterwards, always through
//! a [`SessionPatch`] that is validated against the invariants below:
//!
//! - the cursor never decreases and never exceeds the question count
//! - status never leaves `completed`

use super::narration::NarrationBundle;
use crate::core::error::DomainError;
use crate::question::entities::{Difficulty, QuestionId, TopicFilter};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of an interview session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| DomainError::InvalidInput(format!("invalid session id: {}", e)))
    }
}

/// Reference to the user owning a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    InProgress,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The question a session is currently waiting on, with the narration read before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentSlot {
    pub index: usize,
    pub total: usize,
    pub question_id: QuestionId,
    pub prefix: Option<String>,
}

/// Outcome of advancing the cursor past the current question.
#[derive(Debug, Clone, PartialEq)]
pub struct Advance {
    /// Index of the question that was just answered
    pub answered_index: usize,
    pub question_id: QuestionId,
    /// Patch that moves the stored session to its new state
    pub patch: SessionPatch,
}

impl Advance {
    /// Whether this advance completed the session
    pub fn completes_session(&self) -> bool {
        self.patch.status == Some(SessionStatus::Completed)
    }
}

/// Field-level update of a stored session.
///
/// `expected_index` is a compare-and-swap guard checked by the repository
/// against the stored cursor before anything is written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionPatch {
    pub expected_index: Option<usize>,
    pub current_index: Option<usize>,
    pub status: Option<SessionStatus>,
    pub ended_at: Option<DateTime<Utc>>,
    pub aggregate_feedback: Option<String>,
}

impl SessionPatch {
    pub fn aggregate_feedback(feedback: impl Into<String>) -> Self {
        Self {
            aggregate_feedback: Some(feedback.into()),
            ..Self::default()
        }
    }
}

/// One interview attempt (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    user_id: UserId,
    topic: TopicFilter,
    difficulty: Difficulty,
    question_ids: Vec<QuestionId>,
    current_index: usize,
    status: SessionStatus,
    narration: NarrationBundle,
    aggregate_feedback: Option<String>,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Start a new session over a fixed question list.
    ///
    /// The narration must carry exactly `question_ids.len() - 1` transitions.
    pub fn start(
        user_id: UserId,
        topic: TopicFilter,
        difficulty: Difficulty,
        question_ids: Vec<QuestionId>,
        narration: NarrationBundle,
        started_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if question_ids.is_empty() {
            return Err(DomainError::InvalidInput(
                "a session needs at least one question".to_string(),
            ));
        }
        if !narration.fits(question_ids.len()) {
            return Err(DomainError::InvalidInput(format!(
                "narration has {} transitions, expected {}",
                narration.transitions.len(),
                NarrationBundle::expected_transitions(question_ids.len())
            )));
        }

        Ok(Self {
            id: SessionId::generate(),
            user_id,
            topic,
            difficulty,
            question_ids,
            current_index: 0,
            status: SessionStatus::InProgress,
            narration,
            aggregate_feedback: None,
            started_at,
            ended_at: None,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.user_id == user
    }

    pub fn topic(&self) -> &TopicFilter {
        &self.topic
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn question_ids(&self) -> &[QuestionId] {
        &self.question_ids
    }

    pub fn question_count(&self) -> usize {
        self.question_ids.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn narration(&self) -> &NarrationBundle {
        &self.narration
    }

    pub fn aggregate_feedback(&self) -> Option<&str> {
        self.aggregate_feedback.as_deref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Closing line, available once every question has been answered.
    pub fn closing(&self) -> Option<&str> {
        if self.status.is_terminal() && !self.narration.closing.trim().is_empty() {
            Some(&self.narration.closing)
        } else {
            None
        }
    }

    fn ensure_accepting(&self) -> Result<(), DomainError> {
        if self.status != SessionStatus::InProgress {
            return Err(DomainError::SessionNotActive);
        }
        if self.current_index >= self.question_ids.len() {
            return Err(DomainError::AllQuestionsAnswered);
        }
        Ok(())
    }

    /// The question awaiting an answer and its narration prefix.
    ///
    /// Pure read: calling it repeatedly without an advance yields the same slot.
    pub fn current_slot(&self) -> Result<CurrentSlot, DomainError> {
        self.ensure_accepting()?;
        let index = self.current_index;
        Ok(CurrentSlot {
            index,
            total: self.question_ids.len(),
            question_id: self.question_ids[index],
            prefix: self.narration.prefix_for(index).map(str::to_string),
        })
    }

    /// Compute the transition for answering the current question.
    ///
    /// Moves the cursor forward by exactly one and completes the session when
    /// it reaches the question count. The session itself is not modified; the
    /// returned patch carries the new state and the expected current index.
    pub fn advance(&self, now: DateTime<Utc>) -> Result<Advance, DomainError> {
        self.ensure_accepting()?;

        let answered_index = self.current_index;
        let next_index = answered_index + 1;
        let completes = next_index == self.question_ids.len();

        let patch = SessionPatch {
            expected_index: Some(answered_index),
            current_index: Some(next_index),
            status: completes.then_some(SessionStatus::Completed),
            ended_at: completes.then_some(now),
            aggregate_feedback: None,
        };

        Ok(Advance {
            answered_index,
            question_id: self.question_ids[answered_index],
            patch,
        })
    }

    /// Apply a patch, enforcing the session invariants.
    ///
    /// The `expected_index` guard is not checked here; the repository does that.
    pub fn apply(&mut self, patch: &SessionPatch) -> Result<(), DomainError> {
        if let Some(index) = patch.current_index {
            if index < self.current_index {
                return Err(DomainError::InvalidInput(format!(
                    "session index cannot move backwards ({} -> {})",
                    self.current_index, index
                )));
            }
            if index > self.question_ids.len() {
                return Err(DomainError::InvalidInput(format!(
                    "session index {} exceeds question count {}",
                    index,
                    self.question_ids.len()
                )));
            }
        }
        if let Some(status) = patch.status
            && self.status.is_terminal()
            && !status.is_terminal()
        {
            return Err(DomainError::InvalidInput(
                "a completed session cannot be reopened".to_string(),
            ));
        }

        if let Some(index) = patch.current_index {
            self.current_index = index;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(ended_at) = patch.ended_at {
            self.ended_at = Some(ended_at);
        }
        if let Some(feedback) = &patch.aggregate_feedback {
            self.aggregate_feedback = Some(feedback.clone());
        }
        Ok(())
    }
}
