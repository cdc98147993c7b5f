//! Prompt domain
//!
//! Templates for the rubric grader, feedback coach and script writer/reviewer.

mod template;

pub use template::{DEFAULT_RUBRIC_ANCHORS, DEFAULT_RUBRIC_SYSTEM, InterviewPromptTemplate};
