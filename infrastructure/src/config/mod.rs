//! Configuration file loading for interview-coach
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `INTERVIEW_*` environment variables (`__` separates nested keys)
//! 2. `--config <path>` specified file
//! 3. Project root: `./interview.toml` or `./.interview.toml`
//! 4. Global: `$XDG_CONFIG_HOME/interview-coach/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileEmbeddingConfig, FileGradingConfig,
    FileLoggingConfig, FileProviderConfig, FileQuestionsConfig, FileScriptConfig,
    FileSessionConfig, FileSpeechConfig, FileWorkerConfig,
};
pub use loader::ConfigLoader;
