//! Presentation layer for interview-coach
//!
//! This crate contains CLI definitions, report formatters,
//! progress reporters, and the interactive interview loop.

pub mod cli;
pub mod interview;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat};
pub use interview::repl::{InterviewRepl, ReplError, ReplOutcome};
pub use output::console::ConsoleFormatter;
pub use output::formatter::ReportFormatter;
pub use output::json::JsonFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
