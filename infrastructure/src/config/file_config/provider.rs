//! Remote service settings (`[provider]`, `[embedding]` and `[speech]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// OpenAI-compatible chat completion endpoint used for grading, feedback and narration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL including the version prefix, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead)
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    /// Token limit of per-answer feedback
    pub feedback_max_tokens: u32,
    /// Token limit of whole-session feedback
    pub summary_max_tokens: u32,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
            feedback_max_tokens: 140,
            summary_max_tokens: 400,
        }
    }
}

impl FileProviderConfig {
    /// Explicit key first, then the configured environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), &self.api_key_env)
    }
}

/// Embedding endpoint; unset fields fall back to `[provider]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEmbeddingConfig {
    pub base_url: Option<String>,
    pub api_key_env: Option<String>,
    pub model: String,
    pub timeout_secs: Option<u64>,
}

impl Default for FileEmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key_env: None,
            model: "text-embedding-3-small".to_string(),
            timeout_secs: None,
        }
    }
}

impl FileEmbeddingConfig {
    pub fn base_url<'a>(&'a self, provider: &'a FileProviderConfig) -> &'a str {
        self.base_url.as_deref().unwrap_or(&provider.base_url)
    }

    pub fn timeout_secs(&self, provider: &FileProviderConfig) -> u64 {
        self.timeout_secs.unwrap_or(provider.timeout_secs)
    }

    pub fn resolve_api_key(&self, provider: &FileProviderConfig) -> Option<String> {
        match &self.api_key_env {
            Some(env) => resolve_key(None, env),
            None => provider.resolve_api_key(),
        }
    }
}

/// Text-to-speech and transcription; unset endpoint fields fall back to `[provider]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSpeechConfig {
    pub enabled: bool,
    pub base_url: Option<String>,
    pub api_key_env: Option<String>,
    pub tts_model: String,
    pub voice: String,
    /// Delivery instructions sent with every synthesis request
    pub instructions: String,
    pub stt_model: String,
    /// Directory synthesized audio is cached in
    pub audio_dir: PathBuf,
    pub timeout_secs: u64,
}

impl Default for FileSpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: None,
            api_key_env: None,
            tts_model: "gpt-4o-mini-tts".to_string(),
            voice: "echo".to_string(),
            instructions: "Speak in a friendly conversational tone.".to_string(),
            stt_model: "whisper-1".to_string(),
            audio_dir: PathBuf::from("static/tts"),
            timeout_secs: 60,
        }
    }
}

impl FileSpeechConfig {
    pub fn base_url<'a>(&'a self, provider: &'a FileProviderConfig) -> &'a str {
        self.base_url.as_deref().unwrap_or(&provider.base_url)
    }

    pub fn resolve_api_key(&self, provider: &FileProviderConfig) -> Option<String> {
        match &self.api_key_env {
            Some(env) => resolve_key(None, env),
            None => provider.resolve_api_key(),
        }
    }
}

fn resolve_key(explicit: Option<&str>, env: &str) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var(env).ok())
        .filter(|key| !key.trim().is_empty())
}
