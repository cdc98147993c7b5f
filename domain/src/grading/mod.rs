//! Answer grading.
//!
//! Three sub-scores on 0–100 (semantic can dip below 0) are blended into
//! one normalized score, clamped after the blend:
//!
//! | Sub-score | Default weight | Source |
//! |-----------|----------------|--------|
//! | semantic  | 0.40 | [`similarity::semantic_score`] of answer/reference embeddings |
//! | keyword   | 0.30 | [`keyword::keyword_coverage`] |
//! | rubric    | 0.30 | [`rubric::parse_rubric_score`] of a language-model verdict |
//!
//! The I/O around these (embedding, rubric call) lives in the application layer.

pub mod composite;
pub mod keyword;
pub mod rubric;
pub mod similarity;
