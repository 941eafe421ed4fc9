//! Transcript evaluation endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use fluenta_common::models::ScoreSet;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /api/evaluate request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub transcript: String,
    pub prompt_id: i64,
}

/// POST /api/evaluate
///
/// Scores a transcript against its prompt. Never fails past validation:
/// upstream errors degrade to heuristic output flagged `fallback: true`.
pub async fn evaluate_transcript(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> ApiResult<Json<ScoreSet>> {
    if request.transcript.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "transcript must not be empty".to_string(),
        ));
    }

    let prompt = state
        .store
        .get_prompt(request.prompt_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Unknown prompt id {}", request.prompt_id)))?;

    let scores = state
        .evaluator
        .evaluate(&request.transcript, &prompt.text)
        .await;
    Ok(Json(scores))
}

/// Build evaluate routes
pub fn evaluate_routes() -> Router<AppState> {
    Router::new().route("/api/evaluate", post(evaluate_transcript))
}
