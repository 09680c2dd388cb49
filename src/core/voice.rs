//! Speech collaborators: text to speech and speech to text
//!
//! Both directions are best effort. Any failure is logged and reported as
//! `None`; nothing here ever fails a request on its own.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default synthesis language
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default audio format when the upload carries no extension
pub const DEFAULT_AUDIO_FORMAT: &str = "wav";

#[async_trait]
pub trait VoiceEngine: Send + Sync {
    /// Synthesize `text`; returns base64-encoded audio
    async fn text_to_speech(&self, text: &str, language: &str) -> Option<String>;

    /// Transcribe raw audio bytes of the given container format
    async fn speech_to_text(&self, audio: &[u8], format: &str) -> Option<String>;
}

/// Engine with no backends configured. Always `None`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoVoice;

#[async_trait]
impl VoiceEngine for NoVoice {
    async fn text_to_speech(&self, _text: &str, _language: &str) -> Option<String> {
        None
    }

    async fn speech_to_text(&self, _audio: &[u8], _format: &str) -> Option<String> {
        None
    }
}

#[derive(Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
    language: &'a str,
}

#[derive(Deserialize)]
struct SttResponse {
    text: String,
}

/// Engine talking to HTTP speech servers.
///
/// TTS: `POST {tts_url}/api/tts` with `{text, language}`, audio bytes back.
/// STT: `POST {stt_url}/transcribe?format=<ext>` with raw audio, `{"text"}` back.
#[derive(Debug, Clone, Default)]
pub struct HttpVoiceEngine {
    client: reqwest::Client,
    tts_url: Option<String>,
    stt_url: Option<String>,
}

impl HttpVoiceEngine {
    pub fn new(tts_url: Option<String>, stt_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            tts_url,
            stt_url,
        }
    }

    async fn synthesize(&self, base: &str, text: &str, language: &str) -> reqwest::Result<Vec<u8>> {
        let bytes = self
            .client
            .post(format!("{}/api/tts", base.trim_end_matches('/')))
            .json(&TtsRequest { text, language })
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }

    async fn transcribe(&self, base: &str, audio: &[u8], format: &str) -> reqwest::Result<String> {
        let response: SttResponse = self
            .client
            .post(format!("{}/transcribe", base.trim_end_matches('/')))
            .query(&[("format", format)])
            .body(audio.to_vec())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.text.trim().to_string())
    }
}

#[async_trait]
impl VoiceEngine for HttpVoiceEngine {
    async fn text_to_speech(&self, text: &str, language: &str) -> Option<String> {
        let Some(base) = self.tts_url.as_deref() else {
            warn!("text to speech requested but no TTS server is configured");
            return None;
        };
        match self.synthesize(base, text, language).await {
            Ok(audio) if !audio.is_empty() => Some(STANDARD.encode(audio)),
            Ok(_) => {
                warn!("TTS server returned no audio");
                None
            }
            Err(e) => {
                warn!(error = %e, "text to speech failed");
                None
            }
        }
    }

    async fn speech_to_text(&self, audio: &[u8], format: &str) -> Option<String> {
        let Some(base) = self.stt_url.as_deref() else {
            warn!("speech to text requested but no STT server is configured");
            return None;
        };
        match self.transcribe(base, audio, format).await {
            Ok(text) if !text.is_empty() => Some(text),
            Ok(_) => {
                warn!("STT server returned an empty transcript");
                None
            }
            Err(e) => {
                warn!(error = %e, "speech to text failed");
                None
            }
        }
    }
}

/// Audio format from an upload filename, `wav` when there is no extension
pub fn audio_format(filename: Option<&str>) -> String {
    filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.trim().to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| DEFAULT_AUDIO_FORMAT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_format() {
        assert_eq!(audio_format(Some("note.MP3")), "mp3");
        assert_eq!(audio_format(Some("recording")), "wav");
        assert_eq!(audio_format(Some("trailing.")), "wav");
        assert_eq!(audio_format(None), "wav");
    }

    #[tokio::test]
    async fn test_unconfigured_engine_returns_none() {
        let engine = HttpVoiceEngine::new(None, None);
        assert_eq!(engine.text_to_speech("hi", DEFAULT_LANGUAGE).await, None);
        assert_eq!(engine.speech_to_text(b"RIFF", "wav").await, None);
    }
}
