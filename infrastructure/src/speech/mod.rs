//! Speech adapters

pub mod openai;

pub use openai::{OpenAiSpeech, SpeechSettings};
