//! OpenAI-compatible HTTP adapters for the reasoning and embedding ports.

mod client;
pub mod embeddings;
pub mod openai_compat;

pub use client::ApiClient;
pub use embeddings::OpenAiEmbedder;
pub use openai_compat::OpenAiCompatGateway;
