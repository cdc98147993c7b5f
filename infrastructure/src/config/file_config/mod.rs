//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application
//! configuration by [`FileConfig::to_interview_config`].

mod interview;
mod logging;
mod provider;

pub use interview::{FileGradingConfig, FileScriptConfig, FileSessionConfig, FileWorkerConfig};
pub use logging::{FileLoggingConfig, FileQuestionsConfig};
pub use provider::{FileEmbeddingConfig, FileProviderConfig, FileSpeechConfig};

use interview_application::{
    FeedbackConfig, GradingConfig, InterviewConfig, ScriptConfig, ScriptStrategy, SessionLimits,
    WorkerConfig,
};
use interview_domain::Difficulty;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("{section}.timeout_secs cannot be 0")]
    InvalidTimeout { section: &'static str },

    #[error("{section}: model name cannot be empty")]
    EmptyModelName { section: &'static str },

    #[error("grading.weights: {0}")]
    InvalidWeights(String),

    #[error("grading.keyword_threshold cannot be 0")]
    InvalidKeywordThreshold,

    #[error("script.strategy: {0}")]
    UnknownStrategy(String),

    #[error("session: question bounds {min}..={max} are invalid")]
    InvalidQuestionBounds { min: usize, max: usize },

    #[error("session.default_questions {value} is outside {min}..={max}")]
    DefaultQuestionsOutOfRange { value: usize, min: usize, max: usize },

    #[error("session.default_difficulty: unknown difficulty '{0}'")]
    UnknownDifficulty(String),

    #[error("worker.concurrency and worker.queue_capacity must be at least 1")]
    InvalidWorker,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub provider: FileProviderConfig,
    pub embedding: FileEmbeddingConfig,
    pub speech: FileSpeechConfig,
    pub grading: FileGradingConfig,
    pub script: FileScriptConfig,
    pub session: FileSessionConfig,
    pub worker: FileWorkerConfig,
    pub logging: FileLoggingConfig,
    pub questions: FileQuestionsConfig,
}

impl FileConfig {
    /// Validate the configuration, reporting the first problem found
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.provider.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout { section: "provider" });
        }
        if self.embedding.timeout_secs == Some(0) {
            return Err(ConfigValidationError::InvalidTimeout { section: "embedding" });
        }
        if self.speech.enabled && self.speech.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout { section: "speech" });
        }

        if self.provider.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName { section: "provider" });
        }
        if self.embedding.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName { section: "embedding" });
        }

        self.grading
            .weights
            .validate()
            .map_err(|e| ConfigValidationError::InvalidWeights(e.to_string()))?;
        if self.grading.keyword_threshold == 0 {
            return Err(ConfigValidationError::InvalidKeywordThreshold);
        }

        self.script_strategy()?;

        let session = &self.session;
        if session.min_questions == 0 || session.min_questions > session.max_questions {
            return Err(ConfigValidationError::InvalidQuestionBounds {
                min: session.min_questions,
                max: session.max_questions,
            });
        }
        if !(session.min_questions..=session.max_questions).contains(&session.default_questions) {
            return Err(ConfigValidationError::DefaultQuestionsOutOfRange {
                value: session.default_questions,
                min: session.min_questions,
                max: session.max_questions,
            });
        }
        self.default_difficulty()?;

        if self.worker.concurrency == 0 || self.worker.queue_capacity == 0 {
            return Err(ConfigValidationError::InvalidWorker);
        }

        Ok(())
    }

    pub fn script_strategy(&self) -> Result<ScriptStrategy, ConfigValidationError> {
        self.script
            .strategy
            .parse()
            .map_err(ConfigValidationError::UnknownStrategy)
    }

    pub fn default_difficulty(&self) -> Result<Difficulty, ConfigValidationError> {
        self.session
            .default_difficulty
            .parse()
            .map_err(|_| ConfigValidationError::UnknownDifficulty(self.session.default_difficulty.clone()))
    }

    /// Validate and convert into use case configuration
    pub fn to_interview_config(&self) -> Result<InterviewConfig, ConfigValidationError> {
        self.validate()?;

        let grading = GradingConfig::default()
            .with_weights(self.grading.weights)
            .with_keyword_threshold(self.grading.keyword_threshold)
            .with_rubric_system(self.grading.rubric_system.clone())
            .with_rubric_anchors(self.grading.rubric_anchors.clone());
        let grading = GradingConfig {
            rubric_max_tokens: self.grading.rubric_max_tokens,
            rubric_temperature: self.grading.rubric_temperature,
            ..grading
        };

        Ok(InterviewConfig::default()
            .with_grading(grading)
            .with_feedback(FeedbackConfig {
                answer_max_tokens: self.provider.feedback_max_tokens,
                session_max_tokens: self.provider.summary_max_tokens,
            })
            .with_script(ScriptConfig {
                strategy: self.script_strategy()?,
                max_tokens: self.script.max_tokens,
                temperature: self.script.temperature,
            })
            .with_session_limits(SessionLimits {
                min_questions: self.session.min_questions,
                max_questions: self.session.max_questions,
            })
            .with_worker(WorkerConfig {
                concurrency: self.worker.concurrency,
                queue_capacity: self.worker.queue_capacity,
            }))
    }
}
