//! Infrastructure layer for interview-coach
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod speech;
pub mod storage;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use logging::JsonlExchangeLogger;
pub use providers::{ApiClient, OpenAiCompatGateway, OpenAiEmbedder};
pub use speech::{OpenAiSpeech, SpeechSettings};
pub use storage::{InMemoryRepository, QuestionBankError, load_question_bank, parse_question_bank};
