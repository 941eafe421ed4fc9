//! Test category endpoints

use axum::{extract::State, routing::get, Json, Router};
use fluenta_common::models::TestCategory;

use crate::AppState;

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<TestCategory>> {
    Json(state.store.all_categories().await)
}

/// Build category routes
pub fn category_routes() -> Router<AppState> {
    Router::new().route("/api/categories", get(list_categories))
}
