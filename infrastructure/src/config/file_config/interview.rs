//! Interview behavior settings (`[grading]`, `[script]`, `[session]` and `[worker]` sections)

use interview_domain::{
    DEFAULT_KEYWORD_THRESHOLD, DEFAULT_RUBRIC_ANCHORS, DEFAULT_RUBRIC_SYSTEM, GradingWeights,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGradingConfig {
    pub weights: GradingWeights,
    pub keyword_threshold: usize,
    /// System prompt of the rubric call
    pub rubric_system: String,
    /// Score anchors appended to the rubric prompt
    pub rubric_anchors: String,
    pub rubric_max_tokens: u32,
    pub rubric_temperature: f32,
}

impl Default for FileGradingConfig {
    fn default() -> Self {
        Self {
            weights: GradingWeights::default(),
            keyword_threshold: DEFAULT_KEYWORD_THRESHOLD,
            rubric_system: DEFAULT_RUBRIC_SYSTEM.to_string(),
            rubric_anchors: DEFAULT_RUBRIC_ANCHORS.to_string(),
            rubric_max_tokens: 50,
            rubric_temperature: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileScriptConfig {
    /// "template" or "negotiated"
    pub strategy: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for FileScriptConfig {
    fn default() -> Self {
        Self {
            strategy: "template".to_string(),
            max_tokens: 400,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    pub min_questions: usize,
    pub max_questions: usize,
    /// Question count used when the CLI is not given one
    pub default_questions: usize,
    /// Difficulty used when the CLI is not given one
    pub default_difficulty: String,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            min_questions: 1,
            max_questions: 10,
            default_questions: 5,
            default_difficulty: "Junior".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWorkerConfig {
    pub concurrency: usize,
    pub queue_capacity: usize,
}

impl Default for FileWorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            queue_capacity: 64,
        }
    }
}
