//! OpenAI-compatible text-to-speech and transcription.
//!
//! Synthesized audio is cached on disk under a file name derived from the
//! voice settings and the text, so repeated narration is only paid for once.

use crate::providers::ApiClient;
use async_trait::async_trait;
use interview_application::{AudioClip, AudioRef, SpeechError, SpeechPort};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Models and voice used for speech calls
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechSettings {
    pub tts_model: String,
    pub voice: String,
    pub instructions: String,
    pub stt_model: String,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    instructions: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

pub struct OpenAiSpeech {
    client: ApiClient,
    settings: SpeechSettings,
    audio_dir: PathBuf,
}

impl OpenAiSpeech {
    pub fn new(client: ApiClient, settings: SpeechSettings, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            settings,
            audio_dir: audio_dir.into(),
        }
    }

    /// Cache path of the audio for `text`
    pub fn cache_path(&self, text: &str) -> PathBuf {
        self.audio_dir.join(cache_file_name(&self.settings, text))
    }
}

/// Name-based UUID over model, voice and trimmed text
fn cache_file_name(settings: &SpeechSettings, text: &str) -> String {
    let key = format!("{}\n{}\n{}", settings.tts_model, settings.voice, text.trim());
    format!("{}.mp3", Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()))
}

async fn write_audio(path: &Path, bytes: &[u8]) -> Result<(), SpeechError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SpeechError::Synthesis(format!("{}: {}", parent.display(), e)))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| SpeechError::Synthesis(format!("{}: {}", path.display(), e)))
}

#[async_trait]
impl SpeechPort for OpenAiSpeech {
    async fn speak(&self, text: &str) -> Result<AudioRef, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::Synthesis("nothing to speak".to_string()));
        }

        let path = self.cache_path(text);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!("TTS cache hit: {}", path.display());
            return Ok(AudioRef(path.display().to_string()));
        }

        let body = SpeechRequest {
            model: &self.settings.tts_model,
            voice: &self.settings.voice,
            input: text.trim(),
            instructions: &self.settings.instructions,
        };
        let bytes = self
            .client
            .post_for_bytes("audio/speech", &body)
            .await
            .map_err(|e| SpeechError::Synthesis(e.to_string()))?;
        write_audio(&path, &bytes).await?;

        info!("Synthesized {} bytes to {}", bytes.len(), path.display());
        Ok(AudioRef(path.display().to_string()))
    }

    async fn listen(&self, audio: &AudioClip) -> Result<String, SpeechError> {
        if audio.bytes.is_empty() {
            return Err(SpeechError::Transcription("empty audio clip".to_string()));
        }

        let part = Part::bytes(audio.bytes.clone()).file_name(audio.file_name.clone());
        let form = Form::new()
            .text("model", self.settings.stt_model.clone())
            .part("file", part);

        let response: TranscriptionResponse = self
            .client
            .post_multipart("audio/transcriptions", form)
            .await
            .map_err(|e| SpeechError::Transcription(e.to_string()))?;
        Ok(response.text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settings() -> SpeechSettings {
        SpeechSettings {
            tts_model: "gpt-4o-mini-tts".to_string(),
            voice: "echo".to_string(),
            instructions: "Speak in a friendly conversational tone.".to_string(),
            stt_model: "whisper-1".to_string(),
        }
    }

    fn speech(dir: &Path) -> OpenAiSpeech {
        let client = ApiClient::new("http://127.0.0.1:9/v1", None, Duration::from_secs(2)).unwrap();
        OpenAiSpeech::new(client, settings(), dir)
    }

    #[test]
    fn test_cache_name_is_stable_and_trimmed() {
        let a = cache_file_name(&settings(), "Hello there.");
        let b = cache_file_name(&settings(), "  Hello there.\n");
        assert_eq!(a, b);
        assert!(a.ends_with(".mp3"));

        let other_voice = SpeechSettings {
            voice: "alloy".to_string(),
            ..settings()
        };
        assert_ne!(a, cache_file_name(&other_voice, "Hello there."));
    }

    #[tokio::test]
    async fn test_cached_audio_skips_the_network() {
        let dir = tempfile::tempdir().unwrap();
        let speech = speech(dir.path());
        let path = speech.cache_path("Welcome to your interview.");
        std::fs::write(&path, b"mp3").unwrap();

        let audio = speech.speak("Welcome to your interview.").await.unwrap();
        assert_eq!(audio.as_str(), path.display().to_string());
    }

    #[tokio::test]
    async fn test_blank_inputs_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let speech = speech(dir.path());

        assert!(matches!(
            speech.speak("   ").await,
            Err(SpeechError::Synthesis(_))
        ));
        let clip = AudioClip {
            file_name: "answer.webm".to_string(),
            bytes: vec![],
        };
        assert!(matches!(
            speech.listen(&clip).await,
            Err(SpeechError::Transcription(_))
        ));
    }

    #[test]
    fn test_speech_request_omits_empty_instructions() {
        let value = serde_json::to_value(SpeechRequest {
            model: "tts-1",
            voice: "echo",
            input: "hi",
            instructions: "",
        })
        .unwrap();
        assert!(value.get("instructions").is_none());
    }
}
