//! Embedding adapter for `POST {base_url}/embeddings`.

use super::client::ApiClient;
use async_trait::async_trait;
use interview_application::{Embedder, ProviderError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

pub struct OpenAiEmbedder {
    client: ApiClient,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(client: ApiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

/// Vectors in input order; the reply must carry one vector per input.
fn into_vectors(response: EmbeddingResponse, expected: usize) -> Result<Vec<Vec<f32>>, ProviderError> {
    let mut data = response.data;
    if data.len() != expected {
        return Err(ProviderError::InvalidResponse(format!(
            "expected {} embeddings, got {}",
            expected,
            data.len()
        )));
    }
    data.sort_by_key(|d| d.index);
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };
        let response: EmbeddingResponse = self.client.post_json("embeddings", &body).await?;
        into_vectors(response, texts.len())
    }
}
