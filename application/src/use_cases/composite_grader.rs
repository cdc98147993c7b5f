//! Composite Grader
//!
//! Runs the three sub-scores for one answer and blends them. Provider
//! failures never escape: a failed embedding or rubric call degrades that
//! sub-score to 0.

use crate::config::GradingConfig;
use crate::ports::embedder::Embedder;
use crate::ports::exchange_logger::{ExchangeEvent, ExchangeLogger, NoExchangeLogger};
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway, ProviderError};
use interview_domain::{
    GradeReport, InterviewPromptTemplate, SubScores, cosine_similarity, keyword_coverage,
    parse_rubric_score, semantic_score,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Grades answers against a reference answer and keyword list
pub struct CompositeGrader {
    gateway: Arc<dyn LlmGateway>,
    embedder: Arc<dyn Embedder>,
    logger: Arc<dyn ExchangeLogger>,
    config: GradingConfig,
}

impl CompositeGrader {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        embedder: Arc<dyn Embedder>,
        config: GradingConfig,
    ) -> Self {
        Self {
            gateway,
            embedder,
            logger: Arc::new(NoExchangeLogger),
            config,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &GradingConfig {
        &self.config
    }

    /// Grade `answer` for `question`.
    pub async fn grade(
        &self,
        answer: &str,
        reference: &str,
        question: &str,
        keywords: &[String],
    ) -> GradeReport {
        let semantic = self.semantic(answer, reference).await;
        let coverage = keyword_coverage(answer, keywords, self.config.keyword_threshold);
        let rubric = self.rubric(question, reference, answer, keywords).await;

        let sub_scores = SubScores {
            semantic,
            keyword: coverage.score,
            rubric,
        };
        debug!(
            "Sub-scores: semantic={:.1} keyword={:.1} rubric={:.1}",
            sub_scores.semantic, sub_scores.keyword, sub_scores.rubric
        );

        GradeReport::new(sub_scores, &self.config.weights, coverage.hits)
    }

    async fn semantic(&self, answer: &str, reference: &str) -> f64 {
        if answer.trim().is_empty() || reference.trim().is_empty() {
            return 0.0;
        }

        let texts = [answer.to_string(), reference.to_string()];
        match self.embedder.embed(&texts).await {
            Ok(vectors) if vectors.len() == 2 => {
                semantic_score(cosine_similarity(&vectors[0], &vectors[1]))
            }
            Ok(vectors) => {
                warn!("Embedder returned {} vectors for 2 texts", vectors.len());
                0.0
            }
            Err(e) => {
                warn!("Embedding failed, semantic score degraded to 0: {}", e);
                0.0
            }
        }
    }

    async fn rubric(&self, question: &str, reference: &str, answer: &str, keywords: &[String]) -> f64 {
        let prompt = InterviewPromptTemplate::rubric_prompt(
            question,
            reference,
            answer,
            keywords,
            &self.config.rubric_anchors,
        );
        let request = CompletionRequest::new(self.config.rubric_system.clone(), prompt)
            .with_max_tokens(self.config.rubric_max_tokens)
            .with_temperature(self.config.rubric_temperature);

        let reply: Result<String, ProviderError> = self.gateway.complete(request).await;
        match reply {
            Ok(text) => {
                let score = parse_rubric_score(&text);
                self.logger.log(ExchangeEvent::Rubric {
                    question: question.to_string(),
                    reply: text,
                    score,
                });
                score
            }
            Err(e) => {
                warn!("Rubric call failed, rubric score degraded to 0: {}", e);
                self.logger.log(ExchangeEvent::RubricError {
                    question: question.to_string(),
                    error: e.to_string(),
                });
                0.0
            }
        }
    }
}
