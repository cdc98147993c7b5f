//! Interview script (narration) generation.
//!
//! - [`templates`]: randomized template narration, always available
//! - [`negotiation`]: writer/reviewer exchange state machine and reply parsing

pub mod negotiation;
pub mod templates;
