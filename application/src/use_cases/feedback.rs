//! Narrative feedback generation.
//!
//! Unlike grading, feedback failures propagate: the background task that
//! asked for feedback is abandoned and writes nothing.

use crate::config::FeedbackConfig;
use crate::ports::exchange_logger::{ExchangeEvent, ExchangeLogger, NoExchangeLogger};
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway, ProviderError};
use interview_domain::{InterviewPromptTemplate, SessionSummary};
use std::sync::Arc;

pub struct FeedbackWriter {
    gateway: Arc<dyn LlmGateway>,
    logger: Arc<dyn ExchangeLogger>,
    config: FeedbackConfig,
}

impl FeedbackWriter {
    pub fn new(gateway: Arc<dyn LlmGateway>, config: FeedbackConfig) -> Self {
        Self {
            gateway,
            logger: Arc::new(NoExchangeLogger),
            config,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Two to four sentences of coaching on one answer
    pub async fn answer_feedback(
        &self,
        question: &str,
        reference: &str,
        transcript: &str,
        score: u8,
    ) -> Result<String, ProviderError> {
        let request = CompletionRequest::new(
            InterviewPromptTemplate::feedback_system(),
            InterviewPromptTemplate::feedback_prompt(question, reference, transcript, score),
        )
        .with_max_tokens(self.config.answer_max_tokens);

        let text = self.complete("answer_feedback", request).await?;
        self.logger.log(ExchangeEvent::AnswerFeedback {
            question: question.to_string(),
            score,
            feedback: text.clone(),
        });
        Ok(text)
    }

    /// Overall feedback on a whole session
    pub async fn session_feedback(&self, summary: &SessionSummary) -> Result<String, ProviderError> {
        let request = CompletionRequest::new(
            InterviewPromptTemplate::aggregate_system(),
            InterviewPromptTemplate::aggregate_prompt(summary),
        )
        .with_max_tokens(self.config.session_max_tokens);

        let text = self.complete("session_feedback", request).await?;
        self.logger.log(ExchangeEvent::SessionFeedback {
            session_id: summary.session_id,
            answers: summary.answers.len(),
            pending: summary.pending_count(),
            feedback: text.clone(),
        });
        Ok(text)
    }

    async fn complete(&self, kind: &str, request: CompletionRequest) -> Result<String, ProviderError> {
        let text = self.gateway.complete(request).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ProviderError::InvalidResponse(format!("empty {}", kind)));
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FnGateway, ScriptedGateway};

    #[tokio::test]
    async fn test_answer_feedback_trims_reply() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Ok("  Solid answer.\n".to_string())]));
        let writer = FeedbackWriter::new(gateway.clone(), FeedbackConfig::default());

        let text = writer
            .answer_feedback("What is a stack?", "LIFO.", "It is LIFO.", 80)
            .await
            .unwrap();
        assert_eq!(text, "Solid answer.");

        let requests = gateway.requests.lock().unwrap();
        assert_eq!(requests[0].max_tokens, 140);
        assert!(requests[0].user_prompt.contains("Score (0-100): 80"));
    }

    #[tokio::test]
    async fn test_empty_reply_is_an_error() {
        let writer = FeedbackWriter::new(
            Arc::new(FnGateway::new(|_| Ok("   ".to_string()))),
            FeedbackConfig::default(),
        );
        let err = writer.answer_feedback("q", "r", "t", 0).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let writer = FeedbackWriter::new(Arc::new(FnGateway::failing()), FeedbackConfig::default());
        assert_eq!(
            writer.answer_feedback("q", "r", "t", 0).await.unwrap_err(),
            ProviderError::Timeout
        );
    }
}
