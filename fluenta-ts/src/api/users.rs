//! User registration and lookup endpoints

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use fluenta_common::models::User;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /api/users request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub display_name: String,
}

/// POST /api/users
///
/// Registers a new user. Duplicate usernames conflict.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<Json<User>> {
    let username = request.username.trim().to_string();
    if username.is_empty() {
        return Err(ApiError::BadRequest("username must not be empty".to_string()));
    }

    if state.store.get_user_by_username(&username).await.is_some() {
        return Err(ApiError::Conflict(format!(
            "Username already registered: {}",
            username
        )));
    }

    let display_name = if request.display_name.trim().is_empty() {
        username.clone()
    } else {
        request.display_name.trim().to_string()
    };

    let user = state.store.insert_user(username, display_name).await;
    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok(Json(user))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    let user = state
        .store
        .get_user(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Unknown user id {}", id)))?;
    Ok(Json(user))
}

/// Build user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users/:id", get(get_user))
}
