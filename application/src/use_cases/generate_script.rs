//! Script Generator use case
//!
//! Produces the narration bundle of a new session. The negotiated strategy
//! drives the writer/reviewer exchange through the gateway; its result is
//! always completed field by field with template narration, so callers get a
//! full bundle even when every call fails.

use crate::config::{ScriptConfig, ScriptStrategy};
use crate::ports::exchange_logger::{ExchangeEvent, ExchangeLogger, NoExchangeLogger};
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway};
use interview_domain::{
    InterviewPromptTemplate, NarrationBundle, Negotiation, ScriptDraft, template_bundle,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ScriptGenerator {
    gateway: Option<Arc<dyn LlmGateway>>,
    logger: Arc<dyn ExchangeLogger>,
    config: ScriptConfig,
}

impl ScriptGenerator {
    /// Template-only generator
    pub fn templates() -> Self {
        Self {
            gateway: None,
            logger: Arc::new(NoExchangeLogger),
            config: ScriptConfig::default(),
        }
    }

    pub fn new(gateway: Arc<dyn LlmGateway>, config: ScriptConfig) -> Self {
        Self {
            gateway: Some(gateway),
            logger: Arc::new(NoExchangeLogger),
            config,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn strategy(&self) -> ScriptStrategy {
        match (&self.gateway, self.config.strategy) {
            (Some(_), ScriptStrategy::Negotiated) => ScriptStrategy::Negotiated,
            _ => ScriptStrategy::Template,
        }
    }

    /// Narration for a session whose questions have `topics`, in order.
    pub async fn produce(&self, topics: &[String], count: usize) -> NarrationBundle {
        let draft = match (&self.gateway, self.config.strategy) {
            (Some(gateway), ScriptStrategy::Negotiated) => {
                self.negotiate(gateway.as_ref(), topics, count).await
            }
            _ => ScriptDraft::default(),
        };

        let fallback = template_bundle(topics, count, &mut rand::thread_rng());
        draft.complete_with(fallback, count)
    }

    async fn negotiate(&self, gateway: &dyn LlmGateway, topics: &[String], count: usize) -> ScriptDraft {
        let mut negotiation = Negotiation::new();

        while let Some(request) = negotiation.next_request() {
            let (system, user) = InterviewPromptTemplate::negotiation_prompts(&request, topics, count);
            let completion = CompletionRequest::new(system, user.clone())
                .with_max_tokens(self.config.max_tokens)
                .with_temperature(self.config.temperature);

            let reply = match gateway.complete(completion).await {
                Ok(text) => {
                    debug!("{} reply: {} chars", request.label(), text.len());
                    self.logger.log(ExchangeEvent::Script {
                        stage: request.label(),
                        prompt: user,
                        reply: Some(text.clone()),
                        error: None,
                    });
                    Some(text)
                }
                Err(e) => {
                    warn!("{} failed: {}", request.label(), e);
                    self.logger.log(ExchangeEvent::Script {
                        stage: request.label(),
                        prompt: user,
                        reply: None,
                        error: Some(e.to_string()),
                    });
                    None
                }
            };
            negotiation = negotiation.receive(reply.as_deref());
        }

        info!("Script negotiation finished: {:?}", negotiation.outcome());
        negotiation.into_draft()
    }
}
