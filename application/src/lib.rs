//! Application layer for interview-coach
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{
    FeedbackConfig, GradingConfig, InterviewConfig, ScriptConfig, ScriptStrategy, SessionLimits,
    WorkerConfig,
};
pub use ports::{
    embedder::Embedder,
    exchange_logger::{ExchangeEvent, ExchangeLogger, NoExchangeLogger},
    llm_gateway::{CompletionRequest, LlmGateway, ProviderError},
    progress::{NoProgress, ProcessingProgress},
    repository::{InterviewRepository, RepositoryError},
    speech::{AudioClip, AudioRef, SpeechError, SpeechPort},
    task_scheduler::{BackgroundTask, ScheduleError, TaskScheduler},
};
pub use use_cases::background::{BackgroundCoordinator, ProcessingError, TaskProcessor, TaskQueue};
pub use use_cases::composite_grader::CompositeGrader;
pub use use_cases::conduct_interview::{ConductInterviewUseCase, QuestionPrompt, SubmissionReceipt};
pub use use_cases::error::InterviewError;
pub use use_cases::feedback::FeedbackWriter;
pub use use_cases::generate_script::ScriptGenerator;
pub use use_cases::question_catalog::{PoolCount, QuestionCatalogUseCase};
pub use use_cases::review_session::ReviewSessionUseCase;
pub use use_cases::start_interview::{StartInterviewInput, StartInterviewUseCase};
