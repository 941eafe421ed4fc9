//! End-to-end audio submission flow tests
//!
//! Drives POST /api/submit-audio with hand-built multipart bodies and a
//! stub transcriber in place of the hosted speech-to-text service.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tower::util::ServiceExt;

use fluenta_ts::services::evaluator::EvaluationService;
use fluenta_ts::services::transcriber::{TranscribeError, Transcriber};
use fluenta_ts::store::Store;
use fluenta_ts::{build_router, AppState};

const BOUNDARY: &str = "fluenta-test-boundary";
const STUB_TRANSCRIPT: &str =
    "My name is Ana. I live in a small town near the sea. Every morning I \
     walk to work and buy a coffee on the way.";

/// Stub transcription backend returning a fixed transcript
struct StubTranscriber;

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(&self, _audio: &[u8]) -> Result<String, TranscribeError> {
        Ok(STUB_TRANSCRIPT.to_string())
    }
}

/// Test helper: seeded app; uploads land in a fresh temp folder
async fn setup_app(
    transcriber: Option<Arc<dyn Transcriber>>,
) -> (axum::Router, PathBuf, tempfile::TempDir) {
    let store = Arc::new(Store::new());
    store.seed().await;

    let evaluator = Arc::new(EvaluationService::new(vec![]));
    let uploads = tempfile::tempdir().unwrap();
    let uploads_dir = uploads.path().to_path_buf();

    let state = AppState::new(store, transcriber, evaluator, uploads_dir.clone());
    (build_router(state), uploads_dir, uploads)
}

/// Simulated short webm recording (EBML magic plus padding)
fn fake_webm_audio() -> Vec<u8> {
    let mut audio = vec![0x1a, 0x45, 0xdf, 0xa3];
    audio.extend(std::iter::repeat(0u8).take(2048));
    audio
}

/// Build a multipart body with optional parts
fn multipart_body(audio: Option<&[u8]>, prompt_id: Option<&str>, analyze: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some(audio) = audio {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"audio\"; \
                 filename=\"answer.webm\"\r\nContent-Type: audio/webm\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(audio);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(prompt_id) = prompt_id {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; \
                 name=\"promptId\"\r\n\r\n{prompt_id}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(analyze) = analyze {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; \
                 name=\"analyze\"\r\n\r\n{analyze}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn submit_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/submit-audio")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = body.collect().await.expect("Should read body").to_bytes();
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[tokio::test]
async fn test_submit_with_analyze_returns_transcript_and_evaluation() {
    let (app, _, _uploads) = setup_app(Some(Arc::new(StubTranscriber))).await;

    let body = multipart_body(Some(&fake_webm_audio()), Some("1"), Some("true"));
    let response = app.oneshot(submit_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let transcript = body["transcript"].as_str().unwrap();
    assert!(!transcript.is_empty());
    assert_eq!(transcript, STUB_TRANSCRIPT);

    let evaluation = body["evaluation"]
        .as_object()
        .expect("analyze=true should attach an evaluation");
    for field in [
        "overallScore",
        "vocabularyScore",
        "grammarScore",
        "fluencyScore",
        "pronunciationScore",
    ] {
        let score = evaluation[field].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&score), "{} out of bounds", field);
    }
    assert!(body["submissionId"].as_i64().unwrap() >= 1);
}

#[tokio::test]
async fn test_submit_without_analyze_skips_evaluation() {
    let (app, _, _uploads) = setup_app(Some(Arc::new(StubTranscriber))).await;

    let body = multipart_body(Some(&fake_webm_audio()), Some("1"), None);
    let response = app.oneshot(submit_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["transcript"], STUB_TRANSCRIPT);
    assert!(body["evaluation"].is_null());
}

#[tokio::test]
async fn test_submit_without_transcriber_degrades_to_placeholder() {
    let (app, _, _uploads) = setup_app(None).await;

    let body = multipart_body(Some(&fake_webm_audio()), Some("1"), Some("true"));
    let response = app.oneshot(submit_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    // Degraded, but still a non-empty transcript and a full evaluation
    assert!(!body["transcript"].as_str().unwrap().is_empty());
    assert!(body["evaluation"].is_object());
    assert_eq!(body["evaluation"]["fallback"], true);
}

#[tokio::test]
async fn test_submit_missing_audio_rejected() {
    let (app, _, _uploads) = setup_app(Some(Arc::new(StubTranscriber))).await;

    let body = multipart_body(None, Some("1"), None);
    let response = app.oneshot(submit_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_submit_empty_audio_rejected() {
    let (app, _, _uploads) = setup_app(Some(Arc::new(StubTranscriber))).await;

    let body = multipart_body(Some(&[]), Some("1"), None);
    let response = app.oneshot(submit_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_bad_prompt_id_values() {
    let (app, _, _uploads) = setup_app(Some(Arc::new(StubTranscriber))).await;

    // Missing promptId
    let body = multipart_body(Some(&fake_webm_audio()), None, None);
    let response = app.clone().oneshot(submit_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Non-numeric promptId
    let body = multipart_body(Some(&fake_webm_audio()), Some("not-a-number"), None);
    let response = app.clone().oneshot(submit_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown promptId
    let body = multipart_body(Some(&fake_webm_audio()), Some("86000"), None);
    let response = app.oneshot(submit_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_transient_upload_removed_after_processing() {
    let (app, uploads_dir, _uploads) = setup_app(Some(Arc::new(StubTranscriber))).await;

    let body = multipart_body(Some(&fake_webm_audio()), Some("1"), None);
    let response = app.oneshot(submit_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let remaining: Vec<_> = std::fs::read_dir(&uploads_dir).unwrap().collect();
    assert!(
        remaining.is_empty(),
        "uploads folder should be empty after processing"
    );
}
