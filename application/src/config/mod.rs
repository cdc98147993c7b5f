//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`GradingConfig`] / [`FeedbackConfig`]: blend weights, rubric wording, token limits
//! - [`ScriptConfig`]: narration strategy
//! - [`SessionLimits`]: allowed question counts
//! - [`WorkerConfig`]: background concurrency
//! - [`InterviewConfig`]: container grouping all of the above

pub mod grading;
pub mod interview;

pub use grading::{FeedbackConfig, GradingConfig};
pub use interview::{InterviewConfig, ScriptConfig, ScriptStrategy, SessionLimits, WorkerConfig};
