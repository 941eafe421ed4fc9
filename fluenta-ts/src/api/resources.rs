//! Learning resource endpoints

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use fluenta_common::models::{LearningResource, SkillArea};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Query parameters for resource listing
#[derive(Debug, Deserialize)]
pub struct ResourceQuery {
    /// Optional skill-area filter (vocabulary, grammar, fluency,
    /// pronunciation, general)
    pub skill: Option<String>,
}

/// GET /api/resources
pub async fn list_resources(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> ApiResult<Json<Vec<LearningResource>>> {
    match query.skill {
        Some(raw) => {
            let skill: SkillArea = raw
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("Unknown skill area: {}", raw)))?;
            Ok(Json(state.store.resources_by_skill(skill).await))
        }
        None => Ok(Json(state.store.all_resources().await)),
    }
}

/// Build resource routes
pub fn resource_routes() -> Router<AppState> {
    Router::new().route("/api/resources", get(list_resources))
}
