//! Speech port
//!
//! Text-to-speech and speech-to-text, treated as black boxes.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),
}

/// Where synthesized audio can be fetched from (file path or URL).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioRef(pub String);

impl AudioRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AudioRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Recorded audio handed to transcription.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait SpeechPort: Send + Sync {
    /// Synthesize `text` and return a reference to the audio
    async fn speak(&self, text: &str) -> Result<AudioRef, SpeechError>;

    /// Transcribe recorded audio to text
    async fn listen(&self, audio: &AudioClip) -> Result<String, SpeechError>;
}
