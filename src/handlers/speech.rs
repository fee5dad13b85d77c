use crate::{
    errors::{ErrorResponse, ServiceError},
    services::speech::AudioUpload,
    AppState,
};
use axum::{
    extract::{Multipart, State},
    response::Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use utoipa::ToSchema;

const AUDIO_FIELD: &str = "file";
/// Name sent upstream when the upload carries none.
const DEFAULT_FILE_NAME: &str = "audio.webm";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TranscriptionResponse {
    pub text: String,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SpeechRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpeechResponse {
    /// mp3 audio, standard base64
    pub audio_base64: String,
}

/// Multipart form with a single `file` part holding the audio.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct AudioForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/transcribe",
    tag = "speech",
    request_body(content = AudioForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Transcribed text", body = TranscriptionResponse),
        (status = 400, description = "No audio file in the form", body = ErrorResponse),
        (status = 502, description = "Speech provider failed", body = ErrorResponse),
    )
)]
#[instrument(skip(state, multipart))]
pub async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, ServiceError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or(DEFAULT_FILE_NAME).to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServiceError::BadRequest(format!("Failed to read audio: {}", e)))?;
        upload = Some(AudioUpload {
            file_name,
            content_type,
            bytes,
        });
        break;
    }

    let audio = upload.ok_or_else(|| {
        warn!("Transcription request without an audio file");
        ServiceError::BadRequest("Missing audio file".to_string())
    })?;

    let text = state.transcriber.transcribe(audio).await?;
    Ok(Json(TranscriptionResponse { text }))
}

#[utoipa::path(
    post,
    path = "/tts",
    tag = "speech",
    request_body = SpeechRequest,
    responses(
        (status = 200, description = "Synthesized speech", body = SpeechResponse),
        (status = 400, description = "Missing text", body = ErrorResponse),
        (status = 502, description = "Speech provider failed", body = ErrorResponse),
    )
)]
#[instrument(skip(state, payload))]
pub async fn text_to_speech(
    State(state): State<AppState>,
    Json(payload): Json<SpeechRequest>,
) -> Result<Json<SpeechResponse>, ServiceError> {
    let text = match payload.text {
        Some(text) if !text.is_empty() => text,
        _ => return Err(ServiceError::BadRequest("Missing text".to_string())),
    };

    let audio = state.synthesizer.synthesize(&text).await?;
    Ok(Json(SpeechResponse {
        audio_base64: STANDARD.encode(audio),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        services::speech::{MockSynthesizer, MockTranscriber},
    };
    use std::sync::Arc;

    async fn state_with(synthesizer: MockSynthesizer) -> AppState {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        let config = AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8080,
            "development".into(),
        );
        AppState::new(
            Arc::new(db),
            config,
            Arc::new(MockTranscriber::new()),
            Arc::new(synthesizer),
        )
    }

    #[tokio::test]
    async fn tts_encodes_provider_audio() {
        let mut synthesizer = MockSynthesizer::new();
        synthesizer
            .expect_synthesize()
            .withf(|text| text.to_string() == "Su pedido está listo")
            .times(1)
            .returning(|_| Ok(b"ID3audio".to_vec()));

        let state = state_with(synthesizer).await;
        let Json(response) = text_to_speech(
            State(state),
            Json(SpeechRequest {
                text: Some("Su pedido está listo".into()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.audio_base64, STANDARD.encode(b"ID3audio"));
    }

    #[tokio::test]
    async fn tts_rejects_empty_text_without_calling_provider() {
        let mut synthesizer = MockSynthesizer::new();
        synthesizer.expect_synthesize().never();

        let state = state_with(synthesizer).await;
        for payload in [
            SpeechRequest { text: None },
            SpeechRequest {
                text: Some(String::new()),
            },
        ] {
            let err = text_to_speech(State(state.clone()), Json(payload))
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "Bad request: Missing text");
        }
    }

    #[tokio::test]
    async fn tts_surfaces_provider_failure() {
        let mut synthesizer = MockSynthesizer::new();
        synthesizer
            .expect_synthesize()
            .returning(|_| Err(ServiceError::ExternalServiceError("quota exceeded".into())));

        let state = state_with(synthesizer).await;
        let err = text_to_speech(
            State(state),
            Json(SpeechRequest {
                text: Some("hola".into()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_GATEWAY);
    }
}
