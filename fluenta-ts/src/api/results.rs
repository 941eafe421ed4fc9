//! Test result submission and retrieval endpoints

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use fluenta_common::models::{TestResult, TestSubmission};
use fluenta_common::{CefrLevel, Difficulty};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// One recorded answer inside a result submission
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub prompt_id: i64,
    pub transcript: String,
    #[serde(default)]
    pub evaluation: Option<serde_json::Value>,
    #[serde(default)]
    pub audio_url: Option<String>,
}

/// POST /api/submit-test-results request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTestResultsRequest {
    pub user_id: i64,
    pub difficulty: Difficulty,
    pub overall_score: f64,
    pub vocabulary_score: f64,
    pub grammar_score: f64,
    pub fluency_score: f64,
    pub pronunciation_score: f64,
    #[serde(default)]
    pub cefr_level: Option<CefrLevel>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub submissions: Vec<NewSubmission>,
}

/// Stored result with its attached submissions
#[derive(Debug, Serialize)]
pub struct ResultResponse {
    #[serde(flatten)]
    pub result: TestResult,
    pub submissions: Vec<TestSubmission>,
}

/// POST /api/submit-test-results
///
/// Stores the result, attaches its submissions, and folds the overall
/// score into the user's progress rollup.
pub async fn submit_test_results(
    State(state): State<AppState>,
    Json(request): Json<SubmitTestResultsRequest>,
) -> ApiResult<Json<ResultResponse>> {
    if state.store.get_user(request.user_id).await.is_none() {
        return Err(ApiError::NotFound(format!(
            "Unknown user id {}",
            request.user_id
        )));
    }

    // A submission always references a valid prompt
    for submission in &request.submissions {
        if state.store.get_prompt(submission.prompt_id).await.is_none() {
            return Err(ApiError::NotFound(format!(
                "Unknown prompt id {}",
                submission.prompt_id
            )));
        }
    }

    let cefr_level = request
        .cefr_level
        .unwrap_or_else(|| CefrLevel::from_score(request.overall_score));

    let mut result = TestResult {
        id: 0,
        user_id: request.user_id,
        difficulty: request.difficulty,
        overall_score: request.overall_score.clamp(0.0, 100.0),
        vocabulary_score: request.vocabulary_score.clamp(0.0, 100.0),
        grammar_score: request.grammar_score.clamp(0.0, 100.0),
        fluency_score: request.fluency_score.clamp(0.0, 100.0),
        pronunciation_score: request.pronunciation_score.clamp(0.0, 100.0),
        cefr_level,
        strengths: request.strengths,
        improvements: request.improvements,
        recommendations: request.recommendations,
        feedback: request.feedback,
        created_at: Utc::now(),
    };
    result = state.store.insert_result(result).await;

    let mut submissions = Vec::with_capacity(request.submissions.len());
    for submission in request.submissions {
        submissions.push(
            state
                .store
                .insert_submission(
                    result.id,
                    submission.prompt_id,
                    submission.transcript,
                    submission.evaluation,
                    submission.audio_url,
                )
                .await,
        );
    }

    let progress = state
        .store
        .apply_result(result.user_id, result.difficulty, result.overall_score)
        .await;
    tracing::info!(
        result_id = result.id,
        user_id = result.user_id,
        overall = result.overall_score,
        unlocked = %progress.highest_unlocked,
        "Test result stored"
    );

    Ok(Json(ResultResponse {
        result,
        submissions,
    }))
}

/// GET /api/test-results/:id
pub async fn get_test_result(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ResultResponse>> {
    let result = state
        .store
        .get_result(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Unknown result id {}", id)))?;
    let submissions = state.store.submissions_for_result(result.id).await;
    Ok(Json(ResultResponse {
        result,
        submissions,
    }))
}

/// GET /api/test-results/user/:userId
pub async fn get_results_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Json<Vec<TestResult>> {
    Json(state.store.results_for_user(user_id).await)
}

/// Build result routes
pub fn result_routes() -> Router<AppState> {
    Router::new()
        .route("/api/submit-test-results", post(submit_test_results))
        .route("/api/test-results/user/:userId", get(get_results_for_user))
        .route("/api/test-results/:id", get(get_test_result))
}
