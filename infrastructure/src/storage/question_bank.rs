//! TOML question bank loader
//!
//! ```toml
//! [[questions]]
//! topic = "Stacks & Queues"
//! difficulty = "Junior"
//! text = "What are the basic operations you can perform on a stack?"
//! reference_answer = "PUSH adds to the top, POP removes the top, PEEK reads it."
//! keywords = ["push", "pop", "peek", "top"]
//! ```
//!
//! `id` is optional; questions without one are numbered after the highest
//! explicit id, in file order.

use interview_domain::{Difficulty, Question, QuestionId};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuestionBankError {
    #[error("Could not read question bank {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse question bank: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Question #{position}: {reason}")]
    Invalid { position: usize, reason: String },

    #[error("Duplicate question id {0}")]
    DuplicateId(u64),
}

#[derive(Debug, Deserialize)]
struct RawBank {
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    id: Option<u64>,
    topic: String,
    difficulty: String,
    text: String,
    reference_answer: String,
    #[serde(default)]
    keywords: Vec<String>,
}

/// Read and parse the bank at `path`.
pub fn load_question_bank(path: &Path) -> Result<Vec<Question>, QuestionBankError> {
    let raw = std::fs::read_to_string(path).map_err(|source| QuestionBankError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_question_bank(&raw)
}

pub fn parse_question_bank(source: &str) -> Result<Vec<Question>, QuestionBankError> {
    let bank: RawBank = toml::from_str(source)?;

    let mut seen = HashSet::new();
    for id in bank.questions.iter().filter_map(|q| q.id) {
        if !seen.insert(id) {
            return Err(QuestionBankError::DuplicateId(id));
        }
    }
    let mut next_id = seen.iter().copied().max().unwrap_or(0) + 1;

    let mut questions = Vec::with_capacity(bank.questions.len());
    for (i, raw) in bank.questions.into_iter().enumerate() {
        let position = i + 1;
        let invalid = |reason: String| QuestionBankError::Invalid { position, reason };

        for (field, value) in [
            ("topic", &raw.topic),
            ("text", &raw.text),
            ("reference_answer", &raw.reference_answer),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(format!("{} cannot be empty", field)));
            }
        }
        let difficulty: Difficulty = raw.difficulty.parse().map_err(|e| invalid(format!("{}", e)))?;

        let id = match raw.id {
            Some(id) => id,
            None => {
                next_id += 1;
                next_id - 1
            }
        };

        let keywords: Vec<String> = raw
            .keywords
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        questions.push(
            Question::new(
                QuestionId::new(id),
                raw.topic.trim(),
                difficulty,
                raw.text.trim(),
                raw.reference_answer.trim(),
            )
            .with_keywords(keywords),
        );
    }

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANK: &str = r#"
[[questions]]
id = 10
topic = "Stacks & Queues"
difficulty = "Junior"
text = "What is a queue?"
reference_answer = "A FIFO structure."
keywords = ["queue", "FIFO", " "]

[[questions]]
topic = "Databases"
difficulty = "senior"
text = "What is MVCC?"
reference_answer = "Multi-version concurrency control."

[[questions]]
topic = "Databases"
difficulty = "Mid"
text = "What is a join?"
reference_answer = "Combining rows of two tables."
"#;

    #[test]
    fn test_parse_assigns_missing_ids() {
        let questions = parse_question_bank(BANK).unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].id, QuestionId::new(10));
        assert_eq!(questions[0].keywords, vec!["queue", "FIFO"]);
        assert_eq!(questions[1].id, QuestionId::new(11));
        assert_eq!(questions[1].difficulty, Difficulty::Senior);
        assert!(questions[1].keywords.is_empty());
        assert_eq!(questions[2].id, QuestionId::new(12));
        assert_eq!(questions[2].difficulty, Difficulty::Mid);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let bank = r#"
[[questions]]
id = 1
topic = "A"
difficulty = "Junior"
text = "q"
reference_answer = "r"

[[questions]]
id = 1
topic = "B"
difficulty = "Junior"
text = "q"
reference_answer = "r"
"#;
        assert!(matches!(
            parse_question_bank(bank),
            Err(QuestionBankError::DuplicateId(1))
        ));
    }

    #[test]
    fn test_unknown_difficulty_rejected() {
        let bank = r#"
[[questions]]
topic = "A"
difficulty = "Wizard"
text = "q"
reference_answer = "r"
"#;
        assert!(matches!(
            parse_question_bank(bank),
            Err(QuestionBankError::Invalid { position: 1, .. })
        ));
    }

    #[test]
    fn test_blank_text_rejected() {
        let bank = r#"
[[questions]]
topic = "A"
difficulty = "Junior"
text = "   "
reference_answer = "r"
"#;
        let err = parse_question_bank(bank).unwrap_err();
        assert!(err.to_string().contains("text cannot be empty"), "{}", err);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.toml");
        std::fs::write(&path, BANK).unwrap();
        assert_eq!(load_question_bank(&path).unwrap().len(), 3);

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            load_question_bank(&missing),
            Err(QuestionBankError::Io { .. })
        ));
    }

    #[test]
    fn test_seed_bank_parses() {
        let seed = include_str!("../../../questions.toml");
        let questions = parse_question_bank(seed).unwrap();
        assert!(!questions.is_empty());
        assert!(questions.iter().all(|q| !q.keywords.is_empty()));
    }
}
