//! Speech synthesis port and its ElevenLabs adapter.
//!
//! Audio is optional everywhere: callers log a failure and carry on without it.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io/v1/text-to-speech";
const ELEVENLABS_MODEL: &str = "eleven_multilingual_v2";
/// Provider limit per request; longer scripts are cut at a sentence boundary.
const MAX_TTS_CHARS: usize = 5000;

pub const AUDIO_DATA_URL_PREFIX: &str = "data:audio/mp3;base64,";

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TTS API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("nothing to synthesize")]
    EmptyText,
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError>;
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

#[derive(Clone)]
pub struct ElevenLabsClient {
    client: Client,
    api_key: String,
    voice_id: String,
}

impl ElevenLabsClient {
    pub fn new(api_key: String, voice_id: String, timeout: Duration) -> Result<Self, TtsError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            voice_id,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        let text = truncate_for_speech(text, MAX_TTS_CHARS);
        if text.is_empty() {
            return Err(TtsError::EmptyText);
        }

        let response = self
            .client
            .post(format!("{ELEVENLABS_API_URL}/{}", self.voice_id))
            .header("xi-api-key", &self.api_key)
            .header("accept", "audio/mpeg")
            .json(&SynthesisRequest {
                text,
                model_id: ELEVENLABS_MODEL,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TtsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        debug!("TTS returned {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

/// Cuts `text` to at most `limit` characters, backing up to the last sentence
/// end when one exists in the kept part.
pub fn truncate_for_speech(text: &str, limit: usize) -> &str {
    let text = text.trim();
    let Some((cut, _)) = text.char_indices().nth(limit) else {
        return text;
    };
    let head = &text[..cut];
    match head.rfind(|c: char| matches!(c, '.' | '!' | '?')) {
        Some(end) => &head[..=end],
        None => head,
    }
}

/// Inline form stored on bundles and records.
pub fn audio_data_url(bytes: &[u8]) -> String {
    format!("{AUDIO_DATA_URL_PREFIX}{}", STANDARD.encode(bytes))
}
