//! Question bank domain.
//!
//! - [`entities::Question`]: an immutable interview question
//! - [`entities::TopicFilter`]: concrete topic or the `Mixed` sentinel
//! - [`selection::select_questions`]: ordered pick of a session's questions

pub mod entities;
pub mod selection;
