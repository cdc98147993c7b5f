//! Composite score blending

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Blend weights of the three sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradingWeights {
    pub semantic: f64,
    pub keyword: f64,
    pub rubric: f64,
}

impl Default for GradingWeights {
    fn default() -> Self {
        Self {
            semantic: 0.40,
            keyword: 0.30,
            rubric: 0.30,
        }
    }
}

impl GradingWeights {
    pub fn new(semantic: f64, keyword: f64, rubric: f64) -> Result<Self, DomainError> {
        let weights = Self {
            semantic,
            keyword,
            rubric,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn total(&self) -> f64 {
        self.semantic + self.keyword + self.rubric
    }

    /// Weights must be non-negative and sum to 1.
    pub fn validate(&self) -> Result<(), DomainError> {
        if [self.semantic, self.keyword, self.rubric]
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(DomainError::InvalidInput(
                "grading weights must be non-negative".to_string(),
            ));
        }
        if (self.total() - 1.0).abs() > 1e-6 {
            return Err(DomainError::InvalidInput(format!(
                "grading weights must sum to 1.0 (got {:.3})",
                self.total()
            )));
        }
        Ok(())
    }
}

/// The three sub-scores, each on 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SubScores {
    pub semantic: f64,
    pub keyword: f64,
    pub rubric: f64,
}

impl SubScores {
    /// Weighted blend on 0–1.
    pub fn blend(&self, weights: &GradingWeights) -> f64 {
        let raw = self.semantic * weights.semantic
            + self.keyword * weights.keyword
            + self.rubric * weights.rubric;
        raw.clamp(0.0, 100.0) / 100.0
    }
}

/// Outcome of grading one answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeReport {
    /// Normalized 0–1
    pub score: f64,
    pub matched_keywords: Vec<String>,
    pub sub_scores: SubScores,
}

impl GradeReport {
    pub fn new(sub_scores: SubScores, weights: &GradingWeights, matched_keywords: Vec<String>) -> Self {
        Self {
            score: sub_scores.blend(weights),
            matched_keywords,
            sub_scores,
        }
    }

    /// Integer score persisted on the answer.
    pub fn stored_score(&self) -> u8 {
        (self.score.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_are_valid() {
        let w = GradingWeights::default();
        assert!(w.validate().is_ok());
        assert!((w.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_weights() {
        assert!(GradingWeights::new(0.5, 0.5, 0.5).is_err());
        assert!(GradingWeights::new(-0.2, 0.6, 0.6).is_err());
        assert!(GradingWeights::new(0.5, 0.25, 0.25).is_ok());
    }

    #[test]
    fn test_blend() {
        let subs = SubScores {
            semantic: 80.0,
            keyword: 100.0,
            rubric: 50.0,
        };
        // 32 + 30 + 15
        let report = GradeReport::new(subs, &GradingWeights::default(), vec![]);
        assert!((report.score - 0.77).abs() < 1e-9);
        assert_eq!(report.stored_score(), 77);
    }

    #[test]
    fn test_blend_extremes() {
        let full = SubScores {
            semantic: 100.0,
            keyword: 100.0,
            rubric: 100.0,
        };
        assert_eq!(GradeReport::new(full, &GradingWeights::default(), vec![]).stored_score(), 100);
        let none = SubScores::default();
        assert_eq!(GradeReport::new(none, &GradingWeights::default(), vec![]).stored_score(), 0);
    }

    #[test]
    fn test_negative_semantic_lowers_total() {
        let subs = SubScores {
            semantic: -50.0,
            keyword: 100.0,
            rubric: 100.0,
        };
        // -20 + 30 + 30
        let report = GradeReport::new(subs, &GradingWeights::default(), vec![]);
        assert!((report.score - 0.40).abs() < 1e-9);
        assert_eq!(report.stored_score(), 40);

        let opposite = SubScores {
            semantic: -100.0,
            keyword: 0.0,
            rubric: 50.0,
        };
        assert_eq!(GradeReport::new(opposite, &GradingWeights::default(), vec![]).stored_score(), 0);
    }
}
