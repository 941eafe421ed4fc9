//! fluenta-ts library interface
//!
//! Exposes the router, application state, store, and service adapters for
//! integration testing.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod store;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::evaluator::EvaluationService;
use crate::services::transcriber::Transcriber;
use crate::store::Store;

/// Maximum accepted audio upload size (10 MB)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// In-memory entity store
    pub store: Arc<Store>,
    /// Transcription adapter; None when no AssemblyAI key is configured
    pub transcriber: Option<Arc<dyn Transcriber>>,
    /// Evaluation adapter chain (always present; degrades to heuristic)
    pub evaluator: Arc<EvaluationService>,
    /// Transient audio upload folder
    pub uploads_dir: PathBuf,
}

impl AppState {
    /// Create new application state
    pub fn new(
        store: Arc<Store>,
        transcriber: Option<Arc<dyn Transcriber>>,
        evaluator: Arc<EvaluationService>,
        uploads_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            transcriber,
            evaluator,
            uploads_dir,
        }
    }
}

/// Build application router
///
/// The audio upload route carries its own 10 MB body limit; everything
/// else uses the axum default.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::post;

    let upload = Router::new()
        .route("/api/submit-audio", post(api::submit_audio))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .merge(api::health_routes())
        .merge(api::prompt_routes())
        .merge(api::category_routes())
        .merge(api::resource_routes())
        .merge(api::user_routes())
        .merge(api::progress_routes())
        .merge(api::evaluate_routes())
        .merge(api::result_routes())
        .merge(upload)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
