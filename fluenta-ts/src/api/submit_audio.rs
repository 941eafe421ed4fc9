//! Audio submission endpoint
//!
//! Multipart upload of one recorded answer. The audio lands transiently
//! in the uploads folder, is transcribed (and optionally evaluated), and
//! the file is removed once processing finishes.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use fluenta_common::models::ScoreSet;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Transcript stand-in when no transcription backend is reachable
const TRANSCRIPT_UNAVAILABLE: &str =
    "Transcription is currently unavailable for this recording.";

/// POST /api/submit-audio response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAudioResponse {
    pub submission_id: i64,
    pub prompt_id: i64,
    pub transcript: String,
    pub evaluation: Option<ScoreSet>,
    pub audio_url: Option<String>,
}

/// POST /api/submit-audio
///
/// Multipart fields: `audio` (file, required), `promptId` (required),
/// `analyze` (optional flag). Returns the transcript, and with
/// `analyze=true` a full evaluation as well.
pub async fn submit_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<SubmitAudioResponse>> {
    let mut audio_bytes: Option<Vec<u8>> = None;
    let mut audio_ext = "webm".to_string();
    let mut prompt_id: Option<i64> = None;
    let mut analyze = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart request: {}", e)))?
    {
        match field.name() {
            Some("audio") => {
                audio_ext = extension_for(field.content_type(), field.file_name());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read audio: {}", e)))?;
                audio_bytes = Some(bytes.to_vec());
            }
            Some("promptId") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read promptId: {}", e)))?;
                prompt_id = Some(text.trim().parse().map_err(|_| {
                    ApiError::BadRequest(format!("promptId must be an integer, got: {}", text))
                })?);
            }
            Some("analyze") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read analyze: {}", e)))?;
                analyze = matches!(text.trim(), "true" | "1" | "yes");
            }
            _ => {}
        }
    }

    let audio = audio_bytes.ok_or_else(|| ApiError::BadRequest("Missing audio file".to_string()))?;
    if audio.is_empty() {
        return Err(ApiError::BadRequest("Audio file is empty".to_string()));
    }
    let prompt_id =
        prompt_id.ok_or_else(|| ApiError::BadRequest("Missing promptId field".to_string()))?;
    let prompt = state
        .store
        .get_prompt(prompt_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Unknown prompt id {}", prompt_id)))?;

    // Transient on-disk copy, removed after processing
    let filename = format!("{}.{}", Uuid::new_v4(), audio_ext);
    let audio_path = state.uploads_dir.join(&filename);
    tokio::fs::write(&audio_path, &audio).await?;
    let audio_url = format!("/uploads/{}", filename);
    tracing::debug!(
        bytes = audio.len(),
        path = %audio_path.display(),
        "Audio upload stored"
    );

    let transcript = match &state.transcriber {
        Some(transcriber) => match transcriber.transcribe(&audio).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => TRANSCRIPT_UNAVAILABLE.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Transcription failed, using placeholder");
                TRANSCRIPT_UNAVAILABLE.to_string()
            }
        },
        None => TRANSCRIPT_UNAVAILABLE.to_string(),
    };

    let evaluation = if analyze {
        Some(state.evaluator.evaluate(&transcript, &prompt.text).await)
    } else {
        None
    };

    let raw_evaluation = evaluation
        .as_ref()
        .map(|scores| serde_json::to_value(scores).unwrap_or_default());
    let submission = state
        .store
        .insert_submission(
            0,
            prompt.id,
            transcript.clone(),
            raw_evaluation,
            Some(audio_url.clone()),
        )
        .await;

    if let Err(e) = tokio::fs::remove_file(&audio_path).await {
        tracing::warn!(
            path = %audio_path.display(),
            error = %e,
            "Failed to remove transient audio upload"
        );
    }

    Ok(Json(SubmitAudioResponse {
        submission_id: submission.id,
        prompt_id: prompt.id,
        transcript,
        evaluation,
        audio_url: Some(audio_url),
    }))
}

/// Pick a file extension from the multipart content type or filename
fn extension_for(content_type: Option<&str>, file_name: Option<&str>) -> String {
    if let Some(content_type) = content_type {
        let ext = match content_type {
            "audio/webm" | "video/webm" => Some("webm"),
            "audio/wav" | "audio/x-wav" | "audio/wave" => Some("wav"),
            "audio/mpeg" | "audio/mp3" => Some("mp3"),
            "audio/ogg" | "application/ogg" => Some("ogg"),
            "audio/mp4" | "audio/m4a" | "audio/x-m4a" => Some("m4a"),
            _ => None,
        };
        if let Some(ext) = ext {
            return ext.to_string();
        }
    }

    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "webm".to_string())
}
