//! Integration tests for fluenta-ts API endpoints
//!
//! Tests cover:
//! - Prompt listing, difficulty filter, and lookups
//! - Category and learning resource reference data
//! - User registration and conflict handling
//! - Transcript evaluation with fallback scoring
//! - Test result round-trip and progression unlocks

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot` method

use fluenta_ts::services::evaluator::EvaluationService;
use fluenta_ts::store::Store;
use fluenta_ts::{build_router, AppState};

/// Test helper: app with seeded store, no upstream clients
async fn setup_app() -> axum::Router {
    let store = Arc::new(Store::new());
    store.seed().await;

    let evaluator = Arc::new(EvaluationService::new(vec![]));
    let uploads_dir = tempfile::tempdir().unwrap().into_path();

    let state = AppState::new(store, None, evaluator, uploads_dir);
    build_router(state)
}

/// Test helper: GET request
fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: POST request with JSON body
fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Test helper: register a user, returning its id
async fn register_user(app: &axum::Router, username: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/users",
            &json!({"username": username, "displayName": username}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    extract_json(response.into_body()).await["id"].as_i64().unwrap()
}

fn result_payload(user_id: i64, difficulty: &str, overall: f64) -> Value {
    json!({
        "userId": user_id,
        "difficulty": difficulty,
        "overallScore": overall,
        "vocabularyScore": 78.0,
        "grammarScore": 74.0,
        "fluencyScore": 81.0,
        "pronunciationScore": 77.0,
        "cefrLevel": "C1",
        "strengths": ["Clear structure"],
        "improvements": ["Article usage"],
        "recommendations": ["Record a daily summary"],
        "feedback": "Confident delivery with minor slips.",
        "submissions": [
            {"promptId": 1, "transcript": "My name is Ana...", "audioUrl": null}
        ]
    })
}

// =============================================================================
// Health endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "fluenta-ts");
    assert!(body["version"].is_string());
}

// =============================================================================
// Prompts
// =============================================================================

#[tokio::test]
async fn test_list_prompts_returns_seeded_bank() {
    let app = setup_app().await;

    let response = app.oneshot(get("/api/prompts")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let prompts = body.as_array().expect("prompts should be an array");
    assert!(!prompts.is_empty());
    assert!(prompts[0]["text"].is_string());
    assert!(prompts[0]["difficulty"].is_string());
    assert!(prompts[0]["timeLimitSeconds"].is_number());
}

#[tokio::test]
async fn test_prompts_by_difficulty_filters() {
    let app = setup_app().await;

    let response = app
        .oneshot(get("/api/prompts/difficulty/beginner"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let prompts = body.as_array().unwrap();
    assert!(!prompts.is_empty());
    assert!(prompts.iter().all(|p| p["difficulty"] == "beginner"));
}

#[tokio::test]
async fn test_prompts_unknown_difficulty_rejected() {
    let app = setup_app().await;

    let response = app
        .oneshot(get("/api/prompts/difficulty/legendary"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_get_prompt_by_id() {
    let app = setup_app().await;

    let response = app.clone().oneshot(get("/api/prompts/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["id"], 1);

    let response = app.oneshot(get("/api/prompts/99999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Categories and resources
// =============================================================================

#[tokio::test]
async fn test_list_categories() {
    let app = setup_app().await;

    let response = app.oneshot(get("/api/categories")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let categories = body.as_array().unwrap();
    assert!(!categories.is_empty());
    assert!(categories[0]["name"].is_string());
}

#[tokio::test]
async fn test_list_resources_with_skill_filter() {
    let app = setup_app().await;

    let response = app.clone().oneshot(get("/api/resources")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let all = extract_json(response.into_body()).await;
    let all = all.as_array().unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/resources?skill=vocabulary"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let filtered = extract_json(response.into_body()).await;
    let filtered = filtered.as_array().unwrap();

    assert!(!filtered.is_empty());
    assert!(filtered.len() < all.len());
    assert!(filtered.iter().all(|r| r["skill"] == "vocabulary"));

    let response = app
        .oneshot(get("/api/resources?skill=telepathy"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_register_and_fetch_user() {
    let app = setup_app().await;
    let user_id = register_user(&app, "amara").await;

    let response = app
        .clone()
        .oneshot(get(&format!("/api/users/{}", user_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["username"], "amara");

    let response = app.oneshot(get("/api/users/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let app = setup_app().await;
    register_user(&app, "amara").await;

    let response = app
        .oneshot(post_json(
            "/api/users",
            &json!({"username": "amara", "displayName": "Someone Else"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_blank_username_rejected() {
    let app = setup_app().await;

    let response = app
        .oneshot(post_json(
            "/api/users",
            &json!({"username": "   ", "displayName": "No Name"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Progress
// =============================================================================

#[tokio::test]
async fn test_default_progress_record() {
    let app = setup_app().await;

    let response = app.oneshot(get("/api/user-progress/42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["userId"], 42);
    assert_eq!(body["testsCompleted"], 0);
    assert_eq!(body["highestUnlocked"], "beginner");
}

// =============================================================================
// Evaluation
// =============================================================================

#[tokio::test]
async fn test_evaluate_returns_bounded_fallback_scores() {
    let app = setup_app().await;

    let response = app
        .oneshot(post_json(
            "/api/evaluate",
            &json!({
                "transcript": "Every morning I walk to work and buy a coffee on the way.",
                "promptId": 1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    // No LLM configured in tests, so the heuristic answers and flags itself
    assert_eq!(body["fallback"], true);
    for field in [
        "overallScore",
        "vocabularyScore",
        "grammarScore",
        "fluencyScore",
        "pronunciationScore",
    ] {
        let score = body[field].as_f64().unwrap();
        assert!(
            (0.0..=100.0).contains(&score),
            "{} out of bounds: {}",
            field,
            score
        );
    }
    assert!(body["cefrLevel"].is_string());
}

#[tokio::test]
async fn test_evaluate_empty_transcript_rejected() {
    let app = setup_app().await;

    let response = app
        .oneshot(post_json(
            "/api/evaluate",
            &json!({"transcript": "  ", "promptId": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_evaluate_unknown_prompt_not_found() {
    let app = setup_app().await;

    let response = app
        .oneshot(post_json(
            "/api/evaluate",
            &json!({"transcript": "A full answer.", "promptId": 4040}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Test results
// =============================================================================

#[tokio::test]
async fn test_submit_test_results_round_trip() {
    let app = setup_app().await;
    let user_id = register_user(&app, "amara").await;

    let payload = result_payload(user_id, "beginner", 76.0);
    let response = app
        .clone()
        .oneshot(post_json("/api/submit-test-results", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = extract_json(response.into_body()).await;
    let result_id = stored["id"].as_i64().unwrap();
    assert_eq!(stored["submissions"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/test-results/{}", result_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = extract_json(response.into_body()).await;

    // Round-trip: every submitted field comes back identical
    for field in [
        "overallScore",
        "vocabularyScore",
        "grammarScore",
        "fluencyScore",
        "pronunciationScore",
        "cefrLevel",
        "strengths",
        "improvements",
        "recommendations",
        "feedback",
        "difficulty",
        "userId",
    ] {
        assert_eq!(fetched[field], payload[field], "field {} changed", field);
    }

    let response = app
        .oneshot(get(&format!("/api/test-results/user/{}", user_id)))
        .await
        .unwrap();
    let list = extract_json(response.into_body()).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_submit_results_unknown_user_or_prompt() {
    let app = setup_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/submit-test-results",
            &result_payload(999, "beginner", 70.0),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let user_id = register_user(&app, "jun").await;
    let mut payload = result_payload(user_id, "beginner", 70.0);
    payload["submissions"][0]["promptId"] = json!(55555);
    let response = app
        .oneshot(post_json("/api/submit-test-results", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_high_score_unlocks_next_tier() {
    let app = setup_app().await;
    let user_id = register_user(&app, "amara").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/submit-test-results",
            &result_payload(user_id, "beginner", 85.0),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/user-progress/{}", user_id)))
        .await
        .unwrap();
    let progress = extract_json(response.into_body()).await;
    assert_eq!(progress["highestUnlocked"], "intermediate");
    assert_eq!(progress["testsCompleted"], 1);
    assert_eq!(progress["bestScores"]["beginner"], 85.0);

    // Below the threshold at the new tier: no further unlock
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/submit-test-results",
            &result_payload(user_id, "intermediate", 79.0),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get(&format!("/api/user-progress/{}", user_id)))
        .await
        .unwrap();
    let progress = extract_json(response.into_body()).await;
    assert_eq!(progress["highestUnlocked"], "intermediate");
    assert_eq!(progress["testsCompleted"], 2);
}

#[tokio::test]
async fn test_out_of_range_scores_clamped_on_store() {
    let app = setup_app().await;
    let user_id = register_user(&app, "amara").await;

    let mut payload = result_payload(user_id, "beginner", 70.0);
    payload["overallScore"] = json!(140.0);
    payload["grammarScore"] = json!(-20.0);

    let response = app
        .oneshot(post_json("/api/submit-test-results", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = extract_json(response.into_body()).await;
    assert_eq!(stored["overallScore"], 100.0);
    assert_eq!(stored["grammarScore"], 0.0);
}
