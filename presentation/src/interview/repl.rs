//! Line-based interview loop
//!
//! Each non-command line is submitted as the answer to the current question.
//! Grading runs in the background, so the next question appears immediately.

use crate::ConsoleFormatter;
use colored::Colorize;
use interview_application::{AudioClip, ConductInterviewUseCase, InterviewError};
use interview_domain::{SessionId, UserId};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

const HISTORY_SIZE: usize = 500;

#[derive(Error, Debug)]
pub enum ReplError {
    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Interview(#[from] InterviewError),
}

/// How the interactive loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplOutcome {
    /// Every question was answered
    Completed,
    /// The candidate left before the last answer
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplInput {
    Answer(String),
    Help,
    Repeat,
    Record(PathBuf),
    Quit,
    Unknown(String),
    Empty,
}

fn parse_input(line: &str) -> ReplInput {
    let line = line.trim();
    if line.is_empty() {
        return ReplInput::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return ReplInput::Answer(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match name {
        "help" | "h" | "?" => ReplInput::Help,
        "repeat" | "r" => ReplInput::Repeat,
        "record" if !arg.is_empty() => ReplInput::Record(PathBuf::from(arg)),
        "quit" | "exit" | "q" => ReplInput::Quit,
        _ => ReplInput::Unknown(line.to_string()),
    }
}

/// Interactive interview REPL
pub struct InterviewRepl {
    conduct: Arc<ConductInterviewUseCase>,
    user: UserId,
    session_id: SessionId,
    speak: bool,
    history_path: Option<PathBuf>,
}

impl InterviewRepl {
    pub fn new(conduct: Arc<ConductInterviewUseCase>, user: UserId, session_id: SessionId) -> Self {
        Self {
            conduct,
            user,
            session_id,
            speak: false,
            history_path: dirs::data_dir().map(|p| p.join("interview-coach").join("history.txt")),
        }
    }

    /// Synthesize each question and the closing line
    pub fn with_speech(mut self, speak: bool) -> Self {
        self.speak = speak;
        self
    }

    pub fn with_history_path(mut self, path: Option<PathBuf>) -> Self {
        self.history_path = path;
        self
    }

    fn editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = &self.history_path else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_SIZE, path.clone()) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                tracing::warn!("Answer history unavailable at {}: {}", path.display(), e);
                editor
            }
        }
    }

    /// Run the interview until it completes or the candidate quits
    pub async fn run(&self) -> Result<ReplOutcome, ReplError> {
        let mut editor = self.editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("answer".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();
        self.show_question().await?;

        loop {
            let signal = tokio::task::block_in_place(|| editor.read_line(&prompt))?;
            let line = match signal {
                Signal::Success(line) => line,
                Signal::CtrlC => {
                    println!("{}", "Use /quit to leave the interview.".dimmed());
                    continue;
                }
                _ => return Ok(ReplOutcome::Abandoned),
            };

            let transcript = match parse_input(&line) {
                ReplInput::Empty => continue,
                ReplInput::Help => {
                    Self::print_help();
                    continue;
                }
                ReplInput::Repeat => {
                    self.show_question().await?;
                    continue;
                }
                ReplInput::Quit => {
                    println!(
                        "{}",
                        "Leaving the interview. Answers so far are kept.".yellow()
                    );
                    return Ok(ReplOutcome::Abandoned);
                }
                ReplInput::Unknown(cmd) => {
                    println!("{} {}", "Unknown command:".red(), cmd);
                    println!("Type /help for available commands");
                    continue;
                }
                ReplInput::Record(path) => match self.transcribe(&path).await {
                    Ok(text) => {
                        println!("{} {}", "Heard:".dimmed(), text);
                        text
                    }
                    Err(e) => {
                        println!("{} {}", "Transcription failed:".red(), e);
                        continue;
                    }
                },
                ReplInput::Answer(text) => text,
            };

            match self
                .conduct
                .submit_answer(&self.user, self.session_id, &transcript)
                .await
            {
                Ok(receipt) if receipt.completed => {
                    println!();
                    if let Some(closing) = &receipt.closing {
                        println!("{}", closing.italic());
                    }
                    if self.speak {
                        match self.conduct.speak_closing(&self.user, self.session_id).await {
                            Ok(Some(audio)) => println!("{} {}", "Audio:".dimmed(), audio.as_str()),
                            Ok(None) => {}
                            Err(e) => tracing::warn!("Could not synthesize closing: {}", e),
                        }
                    }
                    return Ok(ReplOutcome::Completed);
                }
                Ok(_) => {
                    println!();
                    self.show_question().await?;
                }
                Err(e) if e.is_client_error() => {
                    println!("{} {}", "Answer not accepted:".red(), e);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn show_question(&self) -> Result<(), InterviewError> {
        if !self.speak {
            let prompt = self
                .conduct
                .current_question(&self.user, self.session_id)
                .await?;
            print!("{}", ConsoleFormatter::format_question(&prompt));
            return Ok(());
        }

        match self.conduct.speak_current(&self.user, self.session_id).await {
            Ok((prompt, audio)) => {
                print!("{}", ConsoleFormatter::format_question(&prompt));
                if let Some(audio) = audio {
                    println!("{} {}", "Audio:".dimmed(), audio.as_str());
                }
            }
            Err(InterviewError::Speech(e)) => {
                tracing::warn!("Speech synthesis failed, showing text only: {}", e);
                let prompt = self
                    .conduct
                    .current_question(&self.user, self.session_id)
                    .await?;
                print!("{}", ConsoleFormatter::format_question(&prompt));
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    async fn transcribe(&self, path: &Path) -> Result<String, InterviewError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| InterviewError::Validation(format!("{}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "answer.wav".to_string());
        self.conduct
            .transcribe(&AudioClip { file_name, bytes })
            .await
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Interview started".cyan().bold());
        println!("{}", format!("Session {}", self.session_id).dimmed());
        println!("Type your answer and press Enter. /help lists commands.");
        println!();
    }

    fn print_help() {
        println!();
        println!("{}", "Commands:".cyan().bold());
        println!("  /help, /h, /?      Show this help");
        println!("  /repeat, /r        Show the current question again");
        println!("  /record <file>     Transcribe an audio file and submit it");
        println!("  /quit, /exit, /q   Leave the interview");
        println!();
    }
}
