//! Sentence-embedding port

use super::llm_gateway::ProviderError;
use async_trait::async_trait;

/// Turns texts into dense vectors of a fixed dimension.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed `texts`, returning one vector per input in the same order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;
}
