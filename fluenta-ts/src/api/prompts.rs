//! Test prompt endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use fluenta_common::models::TestPrompt;
use fluenta_common::Difficulty;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /api/prompts
pub async fn list_prompts(State(state): State<AppState>) -> Json<Vec<TestPrompt>> {
    Json(state.store.all_prompts().await)
}

/// GET /api/prompts/difficulty/:difficulty
pub async fn list_prompts_by_difficulty(
    State(state): State<AppState>,
    Path(difficulty): Path<String>,
) -> ApiResult<Json<Vec<TestPrompt>>> {
    let tier: Difficulty = difficulty
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Unknown difficulty tier: {}", difficulty)))?;
    Ok(Json(state.store.prompts_by_difficulty(tier).await))
}

/// GET /api/prompts/:id
pub async fn get_prompt(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TestPrompt>> {
    let prompt = state
        .store
        .get_prompt(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Unknown prompt id {}", id)))?;
    Ok(Json(prompt))
}

/// Build prompt routes
pub fn prompt_routes() -> Router<AppState> {
    Router::new()
        .route("/api/prompts", get(list_prompts))
        .route(
            "/api/prompts/difficulty/:difficulty",
            get(list_prompts_by_difficulty),
        )
        .route("/api/prompts/:id", get(get_prompt))
}
