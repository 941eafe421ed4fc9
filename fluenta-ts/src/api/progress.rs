//! User progress endpoint

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use fluenta_common::models::UserProgress;

use crate::AppState;

/// GET /api/user-progress/:userId
///
/// Returns the user's rollup, or a fresh default record when the user has
/// not completed any tests yet.
pub async fn get_user_progress(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Json<UserProgress> {
    Json(state.store.get_or_default_progress(user_id).await)
}

/// Build progress routes
pub fn progress_routes() -> Router<AppState> {
    Router::new().route("/api/user-progress/:userId", get(get_user_progress))
}
