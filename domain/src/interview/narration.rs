//! Narration bundle value object

use serde::{Deserialize, Serialize};

/// Spoken narration that accompanies question delivery.
///
/// `transitions[i]` is read before question `i + 1`, so a session of `n`
/// questions carries exactly `n - 1` transitions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NarrationBundle {
    pub intro: String,
    pub transitions: Vec<String>,
    pub closing: String,
}

impl NarrationBundle {
    pub fn new(intro: impl Into<String>, transitions: Vec<String>, closing: impl Into<String>) -> Self {
        Self {
            intro: intro.into(),
            transitions,
            closing: closing.into(),
        }
    }

    /// Number of transitions a session of `question_count` questions needs.
    pub fn expected_transitions(question_count: usize) -> usize {
        question_count.saturating_sub(1)
    }

    /// Whether the bundle fits a session of `question_count` questions.
    pub fn fits(&self, question_count: usize) -> bool {
        self.transitions.len() == Self::expected_transitions(question_count)
    }

    /// Narration read immediately before the question at `index`.
    ///
    /// The intro precedes the first question; afterwards the transition at
    /// `index - 1` is used when present.
    pub fn prefix_for(&self, index: usize) -> Option<&str> {
        let text = if index == 0 {
            Some(self.intro.as_str())
        } else {
            self.transitions.get(index - 1).map(String::as_str)
        };
        text.filter(|t| !t.trim().is_empty())
    }
}

/// Compose the text handed to speech synthesis: narration first, then the question.
pub fn compose_spoken_text(prefix: Option<&str>, question_text: &str) -> String {
    match prefix {
        Some(p) if !p.trim().is_empty() => format!("{} {}", p.trim(), question_text.trim()),
        _ => question_text.trim().to_string(),
    }
}
