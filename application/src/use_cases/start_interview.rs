//! Start Interview use case
//!
//! Selects the questions of a new session, produces its narration and stores
//! it. Both steps run before returning so the new session is complete.

use super::error::InterviewError;
use super::generate_script::ScriptGenerator;
use crate::config::SessionLimits;
use crate::ports::repository::InterviewRepository;
use chrono::Utc;
use interview_domain::{
    Difficulty, QuestionFilter, Session, TopicFilter, UserId, select_questions, topics_in_order,
};
use std::sync::Arc;
use tracing::info;

/// Input for the StartInterview use case
#[derive(Debug, Clone)]
pub struct StartInterviewInput {
    pub user: UserId,
    pub topic: TopicFilter,
    pub difficulty: Difficulty,
    pub question_count: usize,
}

impl StartInterviewInput {
    pub fn new(user: impl Into<UserId>, question_count: usize) -> Self {
        Self {
            user: user.into(),
            topic: TopicFilter::Mixed,
            difficulty: Difficulty::default(),
            question_count,
        }
    }

    pub fn with_topic(mut self, topic: TopicFilter) -> Self {
        self.topic = topic;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }
}

pub struct StartInterviewUseCase {
    repository: Arc<dyn InterviewRepository>,
    script: Arc<ScriptGenerator>,
    limits: SessionLimits,
}

impl StartInterviewUseCase {
    pub fn new(
        repository: Arc<dyn InterviewRepository>,
        script: Arc<ScriptGenerator>,
        limits: SessionLimits,
    ) -> Self {
        Self {
            repository,
            script,
            limits,
        }
    }

    pub async fn execute(&self, input: StartInterviewInput) -> Result<Session, InterviewError> {
        if !self.limits.contains(input.question_count) {
            return Err(InterviewError::Validation(format!(
                "question count must be between {} and {} (got {})",
                self.limits.min_questions, self.limits.max_questions, input.question_count
            )));
        }

        let filter = QuestionFilter::for_session(input.difficulty, &input.topic);
        let pool = self.repository.list_questions(&filter).await?;

        let question_ids =
            select_questions(&pool, input.question_count, &input.topic, &mut rand::thread_rng())?;
        let topics = topics_in_order(&question_ids, &pool);

        let narration = self.script.produce(&topics, question_ids.len()).await;
        let session = Session::start(
            input.user,
            input.topic,
            input.difficulty,
            question_ids,
            narration,
            Utc::now(),
        )?;
        self.repository.create_session(session.clone()).await?;

        info!(
            "Started session {} ({} questions, topic {}, {})",
            session.id(),
            session.question_count(),
            session.topic(),
            session.difficulty()
        );
        Ok(session)
    }
}
