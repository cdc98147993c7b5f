//! Session, script and worker parameters, and the container that groups them.

use super::grading::{FeedbackConfig, GradingConfig};
use serde::{Deserialize, Serialize};

/// Bounds on the number of questions per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLimits {
    pub min_questions: usize,
    pub max_questions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            min_questions: 1,
            max_questions: 10,
        }
    }
}

impl SessionLimits {
    pub fn contains(&self, count: usize) -> bool {
        (self.min_questions..=self.max_questions).contains(&count)
    }
}

/// How narration is produced at session creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptStrategy {
    #[default]
    Template,
    Negotiated,
}

impl std::str::FromStr for ScriptStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "template" | "templates" => Ok(ScriptStrategy::Template),
            "negotiated" | "llm" | "agents" => Ok(ScriptStrategy::Negotiated),
            other => Err(format!("unknown script strategy '{}'", other)),
        }
    }
}

impl std::fmt::Display for ScriptStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptStrategy::Template => write!(f, "template"),
            ScriptStrategy::Negotiated => write!(f, "negotiated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptConfig {
    pub strategy: ScriptStrategy,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            strategy: ScriptStrategy::Template,
            max_tokens: 400,
            temperature: 0.7,
        }
    }
}

/// Background worker sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Tasks allowed to run at the same time
    pub concurrency: usize,
    /// Queued tasks before `schedule` reports back-pressure
    pub queue_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            queue_capacity: 64,
        }
    }
}

/// Everything the use cases need, grouped for wiring in the binary.
///
/// Use cases receive only the slice they need.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterviewConfig {
    pub grading: GradingConfig,
    pub feedback: FeedbackConfig,
    pub script: ScriptConfig,
    pub session: SessionLimits,
    pub worker: WorkerConfig,
}

impl InterviewConfig {
    pub fn with_grading(mut self, grading: GradingConfig) -> Self {
        self.grading = grading;
        self
    }

    pub fn with_feedback(mut self, feedback: FeedbackConfig) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_script(mut self, script: ScriptConfig) -> Self {
        self.script = script;
        self
    }

    pub fn with_session_limits(mut self, limits: SessionLimits) -> Self {
        self.session = limits;
        self
    }

    pub fn with_worker(mut self, worker: WorkerConfig) -> Self {
        self.worker = worker;
        self
    }
}
