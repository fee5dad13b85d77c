//! Speech pass-through: audio to text and text to audio via an external
//! OpenAI-compatible provider. Nothing here is persisted.

use crate::{config::AppConfig, errors::ServiceError};
use async_trait::async_trait;
use bytes::Bytes;
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, instrument};

pub const TRANSCRIPTION_MODEL: &str = "gpt-4o-transcribe";
pub const SPEECH_MODEL: &str = "gpt-4o-mini-tts";
pub const SPEECH_VOICE: &str = "verse";
pub const SPEECH_FORMAT: &str = "mp3";

/// An uploaded audio file as received from the client.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: AudioUpload) -> Result<String, ServiceError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Returns encoded audio (mp3).
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl From<&AppConfig> for SpeechConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            api_key: cfg.openai_api_key.clone(),
            base_url: cfg.openai_base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(cfg.speech_timeout_secs),
        }
    }
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

/// HTTP client for the provider's `/audio/transcriptions` and `/audio/speech`
/// endpoints. No retries; every failure is surfaced to the caller.
#[derive(Clone)]
pub struct OpenAiSpeechClient {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl OpenAiSpeechClient {
    pub fn new(config: SpeechConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ServiceError::InternalError(format!("Failed to build speech HTTP client: {}", e))
            })?;
        Ok(Self { client, config })
    }

    fn api_key(&self) -> Result<&str, ServiceError> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                error!("Speech provider API key is not configured");
                ServiceError::ExternalServiceError(
                    "Speech provider API key is not configured".to_string(),
                )
            })
    }

    async fn check_status(
        operation: &'static str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ProviderErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| {
                if body.trim().is_empty() {
                    format!("provider returned {}", status)
                } else {
                    body
                }
            });

        error!(operation, status = %status, error = %message, "Speech provider request failed");
        counter!("cartasmart_speech.failures", 1, "operation" => operation);
        Err(ServiceError::ExternalServiceError(message))
    }

    fn transport_error(operation: &'static str, err: reqwest::Error) -> ServiceError {
        error!(operation, error = %err, "Speech provider unreachable");
        counter!("cartasmart_speech.failures", 1, "operation" => operation);
        ServiceError::ExternalServiceError(err.to_string())
    }
}

#[async_trait]
impl Transcriber for OpenAiSpeechClient {
    #[instrument(skip(self, audio), fields(file_name = %audio.file_name, size = audio.bytes.len()))]
    async fn transcribe(&self, audio: AudioUpload) -> Result<String, ServiceError> {
        let start = std::time::Instant::now();
        let key = self.api_key()?;

        let mut part = reqwest::multipart::Part::stream(reqwest::Body::from(audio.bytes))
            .file_name(audio.file_name);
        if let Some(content_type) = audio.content_type.as_deref() {
            part = part.mime_str(content_type).map_err(|e| {
                ServiceError::BadRequest(format!("Invalid audio content type: {}", e))
            })?;
        }
        let form = reqwest::multipart::Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.config.base_url))
            .bearer_auth(key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Self::transport_error("transcribe", e))?;
        let response = Self::check_status("transcribe", response).await?;

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| Self::transport_error("transcribe", e))?;

        histogram!("cartasmart_speech.transcribe.duration", start.elapsed());
        info!(chars = body.text.len(), "Audio transcribed");
        Ok(body.text)
    }
}

#[async_trait]
impl Synthesizer for OpenAiSpeechClient {
    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ServiceError> {
        let start = std::time::Instant::now();
        let key = self.api_key()?;

        let response = self
            .client
            .post(format!("{}/audio/speech", self.config.base_url))
            .bearer_auth(key)
            .json(&SpeechRequest {
                model: SPEECH_MODEL,
                voice: SPEECH_VOICE,
                input: text,
                response_format: SPEECH_FORMAT,
            })
            .send()
            .await
            .map_err(|e| Self::transport_error("synthesize", e))?;
        let response = Self::check_status("synthesize", response).await?;

        let audio = response
            .bytes()
            .await
            .map_err(|e| Self::transport_error("synthesize", e))?;

        histogram!("cartasmart_speech.synthesize.duration", start.elapsed());
        info!(bytes = audio.len(), "Speech synthesized");
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_trims_trailing_slash() {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8080,
            "development".into(),
        );
        cfg.openai_base_url = "http://localhost:9000/v1/".into();
        cfg.openai_api_key = Some("sk-test".into());

        let speech = SpeechConfig::from(&cfg);
        assert_eq!(speech.base_url, "http://localhost:9000/v1");
        assert_eq!(speech.api_key.as_deref(), Some("sk-test"));
        assert_eq!(speech.timeout, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn missing_key_is_an_upstream_error() {
        let client = OpenAiSpeechClient::new(SpeechConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        let err = client.synthesize("hola").await.unwrap_err();
        assert!(matches!(err, ServiceError::ExternalServiceError(_)));
    }
}
