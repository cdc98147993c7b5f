//! Test doubles shared by use case tests.

use crate::ports::embedder::Embedder;
use crate::ports::exchange_logger::{ExchangeEvent, ExchangeLogger};
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway, ProviderError};
use crate::ports::repository::{InterviewRepository, RepositoryError};
use crate::ports::task_scheduler::{BackgroundTask, ScheduleError, TaskScheduler};
use async_trait::async_trait;
use interview_domain::{
    Answer, AnswerId, AnswerPatch, Difficulty, Question, QuestionFilter, QuestionId, Session,
    SessionId, SessionPatch, UserId,
};
use std::collections::VecDeque;
use std::sync::Mutex;

type Responder = dyn Fn(&CompletionRequest) -> Result<String, ProviderError> + Send + Sync;

/// Gateway answering through a closure and recording every request
pub struct FnGateway {
    responder: Box<Responder>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl FnGateway {
    pub fn new(
        responder: impl Fn(&CompletionRequest) -> Result<String, ProviderError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self::new(|_| Err(ProviderError::Timeout))
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmGateway for FnGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        (self.responder)(&request)
    }
}

/// Gateway returning scripted replies in order
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedGateway {
    pub fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::InvalidResponse("no more replies".to_string())))
    }
}

/// Embedder returning the same vector for every text
pub struct FixedEmbedder {
    vector: Vec<f32>,
    fail: bool,
    pub calls: Mutex<usize>,
}

impl FixedEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            fail: false,
            calls: Mutex::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            vector: vec![],
            fail: true,
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(ProviderError::Timeout);
        }
        Ok(texts.iter().map(|_| self.vector.clone()).collect())
    }
}

/// Scheduler that only records tasks
#[derive(Default)]
pub struct RecordingScheduler {
    pub tasks: Mutex<Vec<BackgroundTask>>,
}

impl RecordingScheduler {
    pub fn tasks(&self) -> Vec<BackgroundTask> {
        self.tasks.lock().unwrap().clone()
    }
}

impl TaskScheduler for RecordingScheduler {
    fn schedule(&self, task: BackgroundTask) -> Result<(), ScheduleError> {
        self.tasks.lock().unwrap().push(task);
        Ok(())
    }
}

/// Exchange logger keeping event types in memory
#[derive(Default)]
pub struct RecordingLogger {
    pub events: Mutex<Vec<&'static str>>,
}

impl ExchangeLogger for RecordingLogger {
    fn log(&self, event: ExchangeEvent) {
        self.events.lock().unwrap().push(event.kind());
    }
}

/// Minimal repository keeping everything in vectors
#[derive(Default)]
pub struct MemoryRepository {
    questions: Mutex<Vec<Question>>,
    sessions: Mutex<Vec<Session>>,
    answers: Mutex<Vec<Answer>>,
}

impl MemoryRepository {
    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            questions: Mutex::new(questions),
            ..Self::default()
        }
    }
}

#[async_trait]
impl InterviewRepository for MemoryRepository {
    async fn get_question(&self, id: QuestionId) -> Result<Question, RepositoryError> {
        self.questions
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("question", id))
    }

    async fn list_questions(
        &self,
        filter: &QuestionFilter,
    ) -> Result<Vec<Question>, RepositoryError> {
        Ok(self
            .questions
            .lock()
            .unwrap()
            .iter()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect())
    }

    async fn count_questions(&self, filter: &QuestionFilter) -> Result<usize, RepositoryError> {
        Ok(self.list_questions(filter).await?.len())
    }

    async fn create_session(&self, session: Session) -> Result<(), RepositoryError> {
        self.sessions.lock().unwrap().push(session);
        Ok(())
    }

    async fn get_session(&self, id: SessionId) -> Result<Session, RepositoryError> {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id() == id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("session", id))
    }

    async fn update_session(
        &self,
        id: SessionId,
        patch: &SessionPatch,
    ) -> Result<Session, RepositoryError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| RepositoryError::not_found("session", id))?;
        if let Some(expected) = patch.expected_index
            && expected != session.current_index()
        {
            return Err(RepositoryError::Conflict("stale index".to_string()));
        }
        session
            .apply(patch)
            .map_err(|e| RepositoryError::Conflict(e.to_string()))?;
        Ok(session.clone())
    }

    async fn advance_session(
        &self,
        id: SessionId,
        patch: &SessionPatch,
        answer: Answer,
    ) -> Result<Session, RepositoryError> {
        let mut sessions = self.sessions.lock().unwrap();
        let mut answers = self.answers.lock().unwrap();
        let session = sessions
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| RepositoryError::not_found("session", id))?;
        if let Some(expected) = patch.expected_index
            && expected != session.current_index()
        {
            return Err(RepositoryError::Conflict("stale index".to_string()));
        }
        if answers
            .iter()
            .any(|a| a.session_id == answer.session_id && a.question_id == answer.question_id)
        {
            return Err(RepositoryError::Conflict("duplicate answer".to_string()));
        }
        let mut updated = session.clone();
        updated
            .apply(patch)
            .map_err(|e| RepositoryError::Conflict(e.to_string()))?;
        *session = updated.clone();
        answers.push(answer);
        Ok(updated)
    }

    async fn list_sessions(&self, user: &UserId) -> Result<Vec<Session>, RepositoryError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.is_owned_by(user))
            .cloned()
            .collect())
    }

    async fn create_answer(&self, answer: Answer) -> Result<(), RepositoryError> {
        let mut answers = self.answers.lock().unwrap();
        if answers
            .iter()
            .any(|a| a.session_id == answer.session_id && a.question_id == answer.question_id)
        {
            return Err(RepositoryError::Conflict("duplicate answer".to_string()));
        }
        answers.push(answer);
        Ok(())
    }

    async fn get_answer(&self, id: AnswerId) -> Result<Answer, RepositoryError> {
        self.answers
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("answer", id))
    }

    async fn update_answer(
        &self,
        id: AnswerId,
        patch: &AnswerPatch,
    ) -> Result<Answer, RepositoryError> {
        let mut answers = self.answers.lock().unwrap();
        let answer = answers
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| RepositoryError::not_found("answer", id))?;
        answer
            .apply(patch)
            .map_err(|e| RepositoryError::Conflict(e.to_string()))?;
        Ok(answer.clone())
    }

    async fn list_answers(&self, session: SessionId) -> Result<Vec<Answer>, RepositoryError> {
        Ok(self
            .answers
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.session_id == session)
            .cloned()
            .collect())
    }
}

/// A small question bank: two topics, three questions each, all junior
pub fn sample_questions() -> Vec<Question> {
    vec![
        Question::new(1, "Stacks & Queues", Difficulty::Junior, "What is a stack?", "A stack is a LIFO structure where insertion and removal happen at the top.")
            .with_keywords(["stack", "LIFO", "push", "pop"]),
        Question::new(2, "Stacks & Queues", Difficulty::Junior, "What is a queue?", "A queue is a FIFO structure.")
            .with_keywords(["queue", "FIFO", "enqueue", "dequeue"]),
        Question::new(3, "Stacks & Queues", Difficulty::Junior, "What is a deque?", "A double-ended queue.")
            .with_keywords(["deque", "both ends"]),
        Question::new(4, "Databases", Difficulty::Junior, "What is an index?", "A structure that speeds up lookups.")
            .with_keywords(["index", "lookup", "b-tree"]),
        Question::new(5, "Databases", Difficulty::Junior, "What is a primary key?", "A unique row identifier.")
            .with_keywords(["unique", "identifier"]),
        Question::new(6, "Databases", Difficulty::Junior, "What is a transaction?", "An atomic unit of work.")
            .with_keywords(["atomic", "commit", "rollback"]),
    ]
}
