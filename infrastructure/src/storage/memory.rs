//! In-memory repository with an optional JSON snapshot.
//!
//! All records live behind one `RwLock`, so every update is atomic with
//! respect to the others. When a snapshot path is configured, sessions and
//! answers are rewritten to it after each mutation and reloaded on open.
//! Questions are never snapshotted; they come from the question bank.

use async_trait::async_trait;
use interview_application::{InterviewRepository, RepositoryError};
use interview_domain::{
    Answer, AnswerId, AnswerPatch, Question, QuestionFilter, QuestionId, Session, SessionId,
    SessionPatch, UserId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Default)]
struct Store {
    questions: BTreeMap<QuestionId, Question>,
    sessions: HashMap<SessionId, Session>,
    answers: HashMap<AnswerId, Answer>,
}

impl Store {
    fn has_answer(&self, session: SessionId, question: QuestionId) -> bool {
        self.answers
            .values()
            .any(|a| a.session_id == session && a.question_id == question)
    }
}

/// On-disk snapshot format
#[derive(Default, Serialize, Deserialize)]
struct Snapshot {
    sessions: Vec<Session>,
    answers: Vec<Answer>,
}

impl Snapshot {
    fn capture(store: &Store) -> Self {
        let mut sessions: Vec<Session> = store.sessions.values().cloned().collect();
        sessions.sort_by_key(|s| s.started_at());
        let mut answers: Vec<Answer> = store.answers.values().cloned().collect();
        answers.sort_by_key(|a| a.created_at);
        Self { sessions, answers }
    }
}

#[derive(Default)]
pub struct InMemoryRepository {
    store: RwLock<Store>,
    snapshot: Option<PathBuf>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(questions: Vec<Question>) -> Self {
        let store = Store {
            questions: questions.into_iter().map(|q| (q.id, q)).collect(),
            ..Store::default()
        };
        Self {
            store: RwLock::new(store),
            snapshot: None,
        }
    }

    /// Repository persisted to `path`, restoring sessions and answers already there.
    pub async fn open(path: impl Into<PathBuf>, questions: Vec<Question>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let repository = Self {
            snapshot: Some(path.clone()),
            ..Self::with_questions(questions)
        };

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| RepositoryError::Storage(format!("{}: {}", path.display(), e)))?;
            let snapshot: Snapshot = serde_json::from_str(&raw)
                .map_err(|e| RepositoryError::Storage(format!("{}: {}", path.display(), e)))?;

            let mut store = repository.store.write().await;
            info!(
                "Restored {} sessions and {} answers from {}",
                snapshot.sessions.len(),
                snapshot.answers.len(),
                path.display()
            );
            store.sessions = snapshot.sessions.into_iter().map(|s| (s.id(), s)).collect();
            store.answers = snapshot.answers.into_iter().map(|a| (a.id, a)).collect();
        }

        Ok(repository)
    }

    /// Add or replace questions
    pub async fn seed_questions(&self, questions: Vec<Question>) {
        let mut store = self.store.write().await;
        for question in questions {
            store.questions.insert(question.id, question);
        }
    }

    /// Memory stays authoritative when the snapshot cannot be written.
    async fn persist(&self, store: &Store) {
        let Some(path) = &self.snapshot else {
            return;
        };
        if let Err(e) = write_snapshot(path, &Snapshot::capture(store)).await {
            warn!("Could not write snapshot {}: {}", path.display(), e);
        }
    }
}

async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_vec_pretty(snapshot)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await
}

#[async_trait]
impl InterviewRepository for InMemoryRepository {
    async fn get_question(&self, id: QuestionId) -> Result<Question, RepositoryError> {
        self.store
            .read()
            .await
            .questions
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("question", id))
    }

    async fn list_questions(
        &self,
        filter: &QuestionFilter,
    ) -> Result<Vec<Question>, RepositoryError> {
        Ok(self
            .store
            .read()
            .await
            .questions
            .values()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect())
    }

    async fn count_questions(&self, filter: &QuestionFilter) -> Result<usize, RepositoryError> {
        Ok(self
            .store
            .read()
            .await
            .questions
            .values()
            .filter(|q| filter.matches(q))
            .count())
    }

    async fn create_session(&self, session: Session) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        if store.sessions.contains_key(&session.id()) {
            return Err(RepositoryError::Conflict(format!(
                "session {} already exists",
                session.id()
            )));
        }
        store.sessions.insert(session.id(), session);
        self.persist(&store).await;
        Ok(())
    }

    async fn get_session(&self, id: SessionId) -> Result<Session, RepositoryError> {
        self.store
            .read()
            .await
            .sessions
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("session", id))
    }

    async fn update_session(
        &self,
        id: SessionId,
        patch: &SessionPatch,
    ) -> Result<Session, RepositoryError> {
        let mut store = self.store.write().await;
        let session = store
            .sessions
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("session", id))?;

        if let Some(expected) = patch.expected_index
            && expected != session.current_index()
        {
            return Err(RepositoryError::Conflict(format!(
                "session {} moved to index {} (expected {})",
                id,
                session.current_index(),
                expected
            )));
        }

        let mut updated = session.clone();
        updated
            .apply(patch)
            .map_err(|e| RepositoryError::Conflict(e.to_string()))?;
        *session = updated.clone();

        self.persist(&store).await;
        Ok(updated)
    }

    async fn advance_session(
        &self,
        id: SessionId,
        patch: &SessionPatch,
        answer: Answer,
    ) -> Result<Session, RepositoryError> {
        let mut store = self.store.write().await;
        let session = store
            .sessions
            .get(&id)
            .ok_or_else(|| RepositoryError::not_found("session", id))?;

        if let Some(expected) = patch.expected_index
            && expected != session.current_index()
        {
            return Err(RepositoryError::Conflict(format!(
                "session {} moved to index {} (expected {})",
                id,
                session.current_index(),
                expected
            )));
        }
        if store.has_answer(answer.session_id, answer.question_id) {
            return Err(RepositoryError::Conflict(format!(
                "question {} already answered in session {}",
                answer.question_id, answer.session_id
            )));
        }

        let mut updated = session.clone();
        updated
            .apply(patch)
            .map_err(|e| RepositoryError::Conflict(e.to_string()))?;
        store.sessions.insert(id, updated.clone());
        store.answers.insert(answer.id, answer);

        self.persist(&store).await;
        Ok(updated)
    }

    async fn list_sessions(&self, user: &UserId) -> Result<Vec<Session>, RepositoryError> {
        let mut sessions: Vec<Session> = self
            .store
            .read()
            .await
            .sessions
            .values()
            .filter(|s| s.is_owned_by(user))
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.started_at());
        Ok(sessions)
    }

    async fn create_answer(&self, answer: Answer) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        if store.has_answer(answer.session_id, answer.question_id) {
            return Err(RepositoryError::Conflict(format!(
                "question {} already answered in session {}",
                answer.question_id, answer.session_id
            )));
        }
        store.answers.insert(answer.id, answer);
        self.persist(&store).await;
        Ok(())
    }

    async fn get_answer(&self, id: AnswerId) -> Result<Answer, RepositoryError> {
        self.store
            .read()
            .await
            .answers
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("answer", id))
    }

    async fn update_answer(
        &self,
        id: AnswerId,
        patch: &AnswerPatch,
    ) -> Result<Answer, RepositoryError> {
        let mut store = self.store.write().await;
        let answer = store
            .answers
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("answer", id))?;
        answer
            .apply(patch)
            .map_err(|e| RepositoryError::Conflict(e.to_string()))?;
        let updated = answer.clone();

        self.persist(&store).await;
        Ok(updated)
    }

    async fn list_answers(&self, session: SessionId) -> Result<Vec<Answer>, RepositoryError> {
        let mut answers: Vec<Answer> = self
            .store
            .read()
            .await
            .answers
            .values()
            .filter(|a| a.session_id == session)
            .cloned()
            .collect();
        answers.sort_by_key(|a| a.created_at);
        Ok(answers)
    }
}
