//! AssemblyAI speech-to-text client
//!
//! Upload-then-poll flow: raw audio bytes are uploaded first, a transcript
//! job is created against the returned URL, then the job is polled until
//! it completes or fails.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::RateLimiter;

const ASSEMBLYAI_BASE_URL: &str = "https://api.assemblyai.com/v2";
const USER_AGENT: &str = "Fluenta/0.1.0 (https://github.com/fluenta/fluenta)";
const RATE_LIMIT_MS: u64 = 350;
const POLL_INTERVAL_MS: u64 = 1500;
const MAX_POLLS: u32 = 60;

/// Transcription client errors
#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Transcription failed: {0}")]
    Failed(String),

    #[error("Transcription timed out after {0} polls")]
    TimedOut(u32),
}

/// Speech-to-text adapter seam
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio blob to plain text
    async fn transcribe(&self, audio: &[u8]) -> Result<String, TranscribeError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Serialize)]
struct CreateTranscriptRequest<'a> {
    audio_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    id: String,
    status: String,
    text: Option<String>,
    error: Option<String>,
}

/// AssemblyAI API client
pub struct AssemblyAiTranscriber {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
    api_key: String,
}

impl AssemblyAiTranscriber {
    pub fn new(api_key: String) -> Result<Self, TranscribeError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TranscribeError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
            api_key,
        })
    }

    /// Upload raw audio bytes, returning the transient audio URL
    async fn upload(&self, audio: Vec<u8>) -> Result<String, TranscribeError> {
        self.rate_limiter.wait().await;

        let response = self
            .http_client
            .post(format!("{}/upload", ASSEMBLYAI_BASE_URL))
            .header("authorization", &self.api_key)
            .body(audio)
            .send()
            .await
            .map_err(|e| TranscribeError::Network(e.to_string()))?;

        let status = response.status();
        if status == 401 {
            return Err(TranscribeError::InvalidApiKey);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranscribeError::Api(status.as_u16(), error_text));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::Parse(e.to_string()))?;
        Ok(upload.upload_url)
    }

    /// Create a transcript job for an uploaded audio URL
    async fn create_transcript(&self, audio_url: &str) -> Result<String, TranscribeError> {
        self.rate_limiter.wait().await;

        let response = self
            .http_client
            .post(format!("{}/transcript", ASSEMBLYAI_BASE_URL))
            .header("authorization", &self.api_key)
            .json(&CreateTranscriptRequest { audio_url })
            .send()
            .await
            .map_err(|e| TranscribeError::Network(e.to_string()))?;

        let status = response.status();
        if status == 401 {
            return Err(TranscribeError::InvalidApiKey);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranscribeError::Api(status.as_u16(), error_text));
        }

        let transcript: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::Parse(e.to_string()))?;
        Ok(transcript.id)
    }

    /// Poll a transcript job until it completes or errors
    async fn poll_transcript(&self, id: &str) -> Result<String, TranscribeError> {
        for _ in 0..MAX_POLLS {
            tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;

            let response = self
                .http_client
                .get(format!("{}/transcript/{}", ASSEMBLYAI_BASE_URL, id))
                .header("authorization", &self.api_key)
                .send()
                .await
                .map_err(|e| TranscribeError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                return Err(TranscribeError::Api(status.as_u16(), error_text));
            }

            let transcript: TranscriptResponse = response
                .json()
                .await
                .map_err(|e| TranscribeError::Parse(e.to_string()))?;

            match transcript.status.as_str() {
                "completed" => {
                    let text = transcript.text.unwrap_or_default();
                    tracing::info!(
                        transcript_id = %transcript.id,
                        chars = text.len(),
                        "Transcription completed"
                    );
                    return Ok(text);
                }
                "error" => {
                    return Err(TranscribeError::Failed(
                        transcript
                            .error
                            .unwrap_or_else(|| "unknown transcription error".to_string()),
                    ));
                }
                // queued / processing
                _ => continue,
            }
        }

        Err(TranscribeError::TimedOut(MAX_POLLS))
    }
}

#[async_trait]
impl Transcriber for AssemblyAiTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<String, TranscribeError> {
        tracing::debug!(bytes = audio.len(), "Uploading audio to AssemblyAI");
        let audio_url = self.upload(audio.to_vec()).await?;
        let transcript_id = self.create_transcript(&audio_url).await?;
        self.poll_transcript(&transcript_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = AssemblyAiTranscriber::new("test_key".to_string());
        assert!(client.is_ok());
    }

    #[test]
    fn test_transcript_response_parses_completed() {
        let json = r#"{"id": "tr_1", "status": "completed", "text": "hello there", "error": null}"#;
        let parsed: TranscriptResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, "completed");
        assert_eq!(parsed.text.as_deref(), Some("hello there"));
    }

    #[test]
    fn test_transcript_response_parses_error() {
        let json = r#"{"id": "tr_2", "status": "error", "text": null, "error": "bad audio"}"#;
        let parsed: TranscriptResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, "error");
        assert_eq!(parsed.error.as_deref(), Some("bad audio"));
    }
}
