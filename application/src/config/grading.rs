//! Grading and feedback parameters.

use interview_domain::{
    DEFAULT_KEYWORD_THRESHOLD, DEFAULT_RUBRIC_ANCHORS, DEFAULT_RUBRIC_SYSTEM, GradingWeights,
};
use serde::{Deserialize, Serialize};

/// Composite grader configuration.
///
/// Weights and rubric wording are tunable; the defaults reproduce the
/// 0.40 / 0.30 / 0.30 blend with a three-keyword saturation point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingConfig {
    pub weights: GradingWeights,
    /// Matched keywords needed for full keyword coverage
    pub keyword_threshold: usize,
    pub rubric_system: String,
    pub rubric_anchors: String,
    pub rubric_max_tokens: u32,
    pub rubric_temperature: f32,
}

impl Default for GradingConfig {
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

impl GradingConfig {
    pub fn with_weights(mut self, weights: GradingWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_keyword_threshold(mut self, threshold: usize) -> Self {
        self.keyword_threshold = threshold;
        self
    }

    pub fn with_rubric_system(mut self, system: impl Into<String>) -> Self {
        self.rubric_system = system.into();
        self
    }

    pub fn with_rubric_anchors(mut self, anchors: impl Into<String>) -> Self {
        self.rubric_anchors = anchors.into();
        self
    }
}

/// Feedback generation limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackConfig {
    pub answer_max_tokens: u32,
    pub session_max_tokens: u32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            answer_max_tokens: 140,
            session_max_tokens: 400,
        }
    }
}
