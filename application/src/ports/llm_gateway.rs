//! LLM Gateway port
//!
//! Defines the interface for communicating with language-model providers.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during provider calls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Timeout")]
    Timeout,

    #[error("Provider returned status {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// One single-turn completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            max_tokens: 256,
            temperature: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer talks to a reasoning provider.
/// Implementations (adapters) live in the infrastructure layer and apply
/// their own request timeout; expiry surfaces as [`ProviderError::Timeout`].
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send a completion request and return the reply text
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}
