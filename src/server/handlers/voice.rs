use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::llm::LanguageModel;
use crate::state::AppState;

/// All voice turns land in one shared session.
const VOICE_SESSION: &str = "voice_session";

const TRANSCRIBE_INSTRUCTION: &str =
    "Transcribe the audio and provide a helpful response. Format: [Transcription] | [Response]";

/// Voice endpoint: one audio-capable model call transcribes and answers,
/// then the turn is persisted like any chat exchange.
pub async fn voice_chat(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut audio: Option<(Vec<u8>, String)> = None;
    let mut user_id = "default_user".to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart payload: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let mime_type = field
                    .content_type()
                    .unwrap_or("audio/webm")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read audio: {e}")))?;
                audio = Some((bytes.to_vec(), mime_type));
            }
            Some("user_id") => {
                if let Ok(value) = field.text().await {
                    if !value.trim().is_empty() {
                        user_id = value;
                    }
                }
            }
            _ => {}
        }
    }

    let (audio_bytes, mime_type) =
        audio.ok_or_else(|| ApiError::BadRequest("missing audio file".to_string()))?;

    let full_text = state
        .llm
        .generate_with_audio(
            TRANSCRIBE_INSTRUCTION,
            &audio_bytes,
            &mime_type,
            &state.config.generation_model,
        )
        .await?;

    let (user_text, ai_text) = split_transcription(&full_text);

    state
        .history
        .append(VOICE_SESSION, &user_id, &user_text, &ai_text)
        .await?;

    Ok(Json(json!({
        "user_said": user_text,
        "message": ai_text,
        "status": "success"
    })))
}

/// Splits the model's `[Transcription] | [Response]` output. Without a
/// separator the whole text is the response and the transcription is a
/// placeholder.
fn split_transcription(full_text: &str) -> (String, String) {
    let parts: Vec<&str> = full_text.split('|').collect();
    let user_text = if parts.len() > 1 {
        parts[0].trim().to_string()
    } else {
        "Voice Message".to_string()
    };
    let ai_text = parts
        .last()
        .map(|p| p.trim().to_string())
        .unwrap_or_default();
    (user_text, ai_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_splits_transcription_and_response() {
        let (user, ai) = split_transcription("What are your hours? | We are open 9 to 5.");
        assert_eq!(user, "What are your hours?");
        assert_eq!(ai, "We are open 9 to 5.");
    }

    #[test]
    fn missing_separator_keeps_whole_text_as_response() {
        let (user, ai) = split_transcription("We are open 9 to 5.");
        assert_eq!(user, "Voice Message");
        assert_eq!(ai, "We are open 9 to 5.");
    }

    #[test]
    fn extra_separators_take_the_last_part_as_response() {
        let (user, ai) = split_transcription("a | b | final answer");
        assert_eq!(user, "a");
        assert_eq!(ai, "final answer");
    }
}
