//! Keyword coverage scoring.
//!
//! Saturating: matching `threshold` keywords already yields full marks,
//! regardless of how many keywords the question carries.

use std::collections::HashSet;

/// Characters replaced by a space before tokenizing an answer.
pub const STRIPPED_PUNCTUATION: &[char] = &['.', ',', '!', '?', '/', '(', ')', '[', ']', '<', '>'];

/// Matched keywords needed for a full coverage score.
pub const DEFAULT_KEYWORD_THRESHOLD: usize = 3;

/// Result of keyword coverage scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordCoverage {
    /// 0–100
    pub score: f64,
    /// Keywords counted as matched, literal or by word overlap
    pub matched: usize,
    /// Literal substring hits, in keyword order and original casing
    pub hits: Vec<String>,
}

/// Lowercase the answer and blank out punctuation.
pub fn normalize_answer(answer: &str) -> String {
    answer
        .to_lowercase()
        .chars()
        .map(|c| if STRIPPED_PUNCTUATION.contains(&c) { ' ' } else { c })
        .collect()
}

/// Score how many `keywords` the answer covers.
///
/// A keyword matches when its lowercased form is a substring of the normalized
/// answer (reported as a hit), or when any of its words (split on `-` and
/// whitespace) appears in the answer's word set (counted only).
pub fn keyword_coverage(answer: &str, keywords: &[String], threshold: usize) -> KeywordCoverage {
    let normalized = normalize_answer(answer);
    let words: HashSet<&str> = normalized.split_whitespace().collect();

    let mut hits = Vec::new();
    let mut matched = 0;
    for keyword in keywords {
        let lowered = keyword.to_lowercase();
        if lowered.trim().is_empty() {
            continue;
        }
        if normalized.contains(&lowered) {
            matched += 1;
            hits.push(keyword.clone());
            continue;
        }
        let spaced = lowered.replace('-', " ");
        if spaced.split_whitespace().any(|w| words.contains(w)) {
            matched += 1;
        }
    }

    let threshold = threshold.max(1);
    let score = matched.min(threshold) as f64 / threshold as f64 * 100.0;

    KeywordCoverage {
        score,
        matched,
        hits,
    }
}
