//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored console tables
    #[default]
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for interview-coach
#[derive(Parser, Debug)]
#[command(name = "interview-coach")]
#[command(author, version, about = "Practice technical interviews with automatic grading")]
#[command(long_about = r#"
Interview Coach runs a spoken-style technical interview in your terminal.

Each session picks questions from the question bank, narrates them, and
grades every answer in the background with a blend of semantic similarity,
keyword coverage and a rubric verdict. A summary with per-answer and overall
feedback is printed once grading finishes.

Configuration files are loaded from (in priority order):
1. INTERVIEW_* environment variables (e.g. INTERVIEW_PROVIDER__MODEL)
2. --config <path>       Explicit config file
3. ./interview.toml      Project-level config
4. ~/.config/interview-coach/config.toml   Global config

Example:
  interview-coach interview --topic Databases --count 3
  interview-coach questions
  interview-coach history --user alice
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Candidate name sessions are recorded under
    #[arg(short, long, global = true, default_value = "candidate")]
    pub user: String,

    /// Output format for reports
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run an interview session
    Interview {
        /// Topic to draw questions from ("Mixed" for all topics)
        #[arg(short, long, default_value = "Mixed")]
        topic: String,

        /// Junior, Mid or Senior (defaults to the configured difficulty)
        #[arg(short, long)]
        difficulty: Option<String>,

        /// Number of questions (defaults to the configured count)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Narration strategy override: template or negotiated
        #[arg(long, value_name = "STRATEGY")]
        script: Option<String>,

        /// Synthesize narration audio files (requires [speech] configuration)
        #[arg(long)]
        speak: bool,
    },

    /// Show how many questions the bank holds per topic and difficulty
    Questions {
        /// Only count this topic
        #[arg(short, long)]
        topic: Option<String>,

        /// Only count this difficulty
        #[arg(short, long)]
        difficulty: Option<String>,
    },

    /// Show past sessions and per-topic averages
    History,

    /// Show the summary of a completed session
    Summary {
        /// Session id as printed at the end of an interview
        session_id: String,
    },
}
