//! Interview session domain.
//!
//! - [`session::Session`]: the session entity and its state machine
//! - [`answer::Answer`]: provisional / graded answers
//! - [`narration::NarrationBundle`]: intro, transitions and closing lines
//! - [`summary::SessionSummary`]: read model of a finished session

pub mod answer;
pub mod narration;
pub mod session;
pub mod summary;
