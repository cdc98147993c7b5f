//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod background;
pub mod composite_grader;
pub mod conduct_interview;
pub mod error;
pub mod feedback;
pub mod generate_script;
pub mod question_catalog;
pub mod review_session;
pub mod start_interview;
