//! Log and data file settings (`[logging]` and `[questions]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving every model exchange
    pub exchange_log: Option<PathBuf>,
    /// Cap on prompt and reply text per exchange record; 0 keeps it whole
    pub exchange_max_chars: usize,
    /// Tracing output file; stderr only when unset
    pub file: Option<PathBuf>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            exchange_log: None,
            exchange_max_chars: 4000,
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQuestionsConfig {
    /// TOML question bank loaded at startup
    pub bank: PathBuf,
    /// JSON snapshot of sessions and answers; in-memory only when unset
    pub snapshot: Option<PathBuf>,
}

impl Default for FileQuestionsConfig {
    fn default() -> Self {
        Self {
            bank: PathBuf::from("questions.toml"),
            snapshot: None,
        }
    }
}
