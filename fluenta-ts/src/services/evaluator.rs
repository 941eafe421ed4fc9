//! LLM evaluation adapters and fallback chain
//!
//! Given a transcript and the original prompt, produce a structured score
//! object. The primary adapter is Mistral's chat API; OpenAI is an
//! optional second. Any upstream failure or unparsable payload falls
//! through to a statistics-derived heuristic, so evaluation always
//! returns an answer. Fallback output carries `fallback: true`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use fluenta_common::models::ScoreSet;
use fluenta_common::CefrLevel;

use super::RateLimiter;

const MISTRAL_CHAT_URL: &str = "https://api.mistral.ai/v1/chat/completions";
const MISTRAL_MODEL: &str = "mistral-small-latest";
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4o-mini";
const USER_AGENT: &str = "Fluenta/0.1.0 (https://github.com/fluenta/fluenta)";
const RATE_LIMIT_MS: u64 = 500;
const TEMPERATURE: f64 = 0.3;

/// Evaluation client errors
#[derive(Debug, Error)]
pub enum EvaluateError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Empty completion")]
    EmptyCompletion,
}

/// Scoring adapter seam
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Adapter name for logging
    fn name(&self) -> &'static str;

    /// Score a transcript against the prompt it answers
    async fn evaluate(&self, transcript: &str, prompt: &str) -> Result<ScoreSet, EvaluateError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Raw score payload as the LLM returns it; every field tolerated missing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScorePayload {
    overall_score: Option<f64>,
    vocabulary_score: Option<f64>,
    grammar_score: Option<f64>,
    fluency_score: Option<f64>,
    pronunciation_score: Option<f64>,
    cefr_level: Option<String>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    improvements: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
    feedback: Option<String>,
}

/// Chat-completion scoring client (Mistral and OpenAI share the shape)
pub struct ChatEvaluator {
    name: &'static str,
    chat_url: &'static str,
    model: &'static str,
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
    api_key: String,
}

impl ChatEvaluator {
    fn new(
        name: &'static str,
        chat_url: &'static str,
        model: &'static str,
        api_key: String,
    ) -> Result<Self, EvaluateError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| EvaluateError::Network(e.to_string()))?;

        Ok(Self {
            name,
            chat_url,
            model,
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
            api_key,
        })
    }

    /// Primary adapter: Mistral chat completions
    pub fn mistral(api_key: String) -> Result<Self, EvaluateError> {
        Self::new("mistral", MISTRAL_CHAT_URL, MISTRAL_MODEL, api_key)
    }

    /// Optional secondary adapter: OpenAI chat completions
    pub fn openai(api_key: String) -> Result<Self, EvaluateError> {
        Self::new("openai", OPENAI_CHAT_URL, OPENAI_MODEL, api_key)
    }
}

#[async_trait]
impl Evaluator for ChatEvaluator {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn evaluate(&self, transcript: &str, prompt: &str) -> Result<ScoreSet, EvaluateError> {
        self.rate_limiter.wait().await;

        let instruction = build_instruction(transcript, prompt);
        let request = ChatRequest {
            model: self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &instruction,
            }],
            temperature: TEMPERATURE,
        };

        tracing::debug!(adapter = self.name, model = self.model, "Requesting evaluation");

        let response = self
            .http_client
            .post(self.chat_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| EvaluateError::Network(e.to_string()))?;

        let status = response.status();
        if status == 401 {
            return Err(EvaluateError::InvalidApiKey);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EvaluateError::Api(status.as_u16(), error_text));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| EvaluateError::Parse(e.to_string()))?;

        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or(EvaluateError::EmptyCompletion)?;

        parse_score_payload(content)
    }
}

/// Fixed instruction template requesting a strict JSON shape
fn build_instruction(transcript: &str, prompt: &str) -> String {
    format!(
        "You are an English speaking examiner. Assess the spoken answer below \
         for vocabulary, grammar, fluency, and pronunciation.\n\
         \n\
         Prompt: \"{prompt}\"\n\
         Transcript: \"{transcript}\"\n\
         \n\
         Respond with ONLY a JSON object, no surrounding prose, of exactly \
         this shape:\n\
         {{\"overallScore\": <0-100>, \"vocabularyScore\": <0-100>, \
         \"grammarScore\": <0-100>, \"fluencyScore\": <0-100>, \
         \"pronunciationScore\": <0-100>, \"cefrLevel\": \
         \"A1\"|\"A2\"|\"B1\"|\"B2\"|\"C1\"|\"C2\", \
         \"strengths\": [<string>], \"improvements\": [<string>], \
         \"recommendations\": [<string>], \"feedback\": <string>}}"
    )
}

/// Parse the completion text into a ScoreSet
///
/// Tries the whole text as JSON first, then recovers a JSON object
/// embedded in surrounding prose. All scores are clamped to [0,100].
fn parse_score_payload(content: &str) -> Result<ScoreSet, EvaluateError> {
    let payload: RawScorePayload = match serde_json::from_str(content) {
        Ok(payload) => payload,
        Err(_) => {
            let embedded = extract_json_object(content)
                .ok_or_else(|| EvaluateError::Parse("no JSON object in completion".into()))?;
            serde_json::from_str(embedded)
                .map_err(|e| EvaluateError::Parse(e.to_string()))?
        }
    };

    let dimension_scores = [
        payload.vocabulary_score,
        payload.grammar_score,
        payload.fluency_score,
        payload.pronunciation_score,
    ];
    if payload.overall_score.is_none() && dimension_scores.iter().all(Option::is_none) {
        return Err(EvaluateError::Parse("payload carries no scores".into()));
    }

    let known: Vec<f64> = dimension_scores.iter().filter_map(|s| *s).collect();
    let dimension_mean = if known.is_empty() {
        payload.overall_score.unwrap_or(0.0)
    } else {
        known.iter().sum::<f64>() / known.len() as f64
    };
    let overall = payload.overall_score.unwrap_or(dimension_mean);

    let cefr_level = payload
        .cefr_level
        .as_deref()
        .and_then(|s| s.parse::<CefrLevel>().ok())
        .unwrap_or_else(|| CefrLevel::from_score(overall.clamp(0.0, 100.0)));

    let mut scores = ScoreSet {
        overall_score: overall,
        vocabulary_score: payload.vocabulary_score.unwrap_or(dimension_mean),
        grammar_score: payload.grammar_score.unwrap_or(dimension_mean),
        fluency_score: payload.fluency_score.unwrap_or(dimension_mean),
        pronunciation_score: payload.pronunciation_score.unwrap_or(dimension_mean),
        cefr_level,
        strengths: payload.strengths,
        improvements: payload.improvements,
        recommendations: payload.recommendations,
        feedback: payload.feedback.unwrap_or_default(),
        fallback: false,
    };
    scores.clamp_scores();
    Ok(scores)
}

/// Recover a JSON object embedded in surrounding prose
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

/// Statistics-derived heuristic scores over the bare transcript
///
/// Pronunciation cannot be assessed from text, so it sits at a neutral
/// midpoint and the feedback says so.
fn heuristic_scores(transcript: &str) -> ScoreSet {
    let words: Vec<&str> = transcript.split_whitespace().collect();
    let word_count = words.len();
    if word_count == 0 {
        return constant_fallback();
    }

    let sentence_count = transcript
        .matches(|c: char| matches!(c, '.' | '!' | '?'))
        .count()
        .max(1);
    let distinct = words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<HashSet<_>>()
        .len();
    let distinct_ratio = distinct as f64 / word_count as f64;
    let avg_sentence_len = word_count as f64 / sentence_count as f64;

    let fluency = (35.0 + (word_count as f64).min(120.0) * 0.45).clamp(0.0, 90.0);
    let vocabulary =
        (30.0 + distinct_ratio * 50.0 + (word_count as f64 / 20.0).min(10.0)).clamp(0.0, 90.0);
    let grammar = (65.0 - (avg_sentence_len - 12.0).abs() * 1.5).clamp(35.0, 80.0);
    let pronunciation = 60.0;
    let overall = (fluency + vocabulary + grammar + pronunciation) / 4.0;

    let mut scores = ScoreSet {
        overall_score: overall,
        vocabulary_score: vocabulary,
        grammar_score: grammar,
        fluency_score: fluency,
        pronunciation_score: pronunciation,
        cefr_level: CefrLevel::from_score(overall),
        strengths: vec!["You completed the speaking task".to_string()],
        improvements: vec![
            "Automated detailed feedback was unavailable for this attempt".to_string(),
        ],
        recommendations: vec![
            "Retry later for a full AI evaluation".to_string(),
            "Practice speaking in complete sentences".to_string(),
        ],
        feedback: format!(
            "Estimated from transcript statistics ({} words, {} sentences). \
             Pronunciation could not be assessed from text.",
            word_count, sentence_count
        ),
        fallback: true,
    };
    scores.clamp_scores();
    scores
}

/// Constant fallback tuple for empty or missing transcripts
fn constant_fallback() -> ScoreSet {
    ScoreSet {
        overall_score: 40.0,
        vocabulary_score: 40.0,
        grammar_score: 40.0,
        fluency_score: 40.0,
        pronunciation_score: 40.0,
        cefr_level: CefrLevel::from_score(40.0),
        strengths: vec![],
        improvements: vec!["No speech was detected in the recording".to_string()],
        recommendations: vec![
            "Check your microphone and record again".to_string(),
        ],
        feedback: "The transcript was empty, so scores are placeholder values.".to_string(),
        fallback: true,
    }
}

/// Evaluation adapter chain: hosted LLMs first, heuristic last
///
/// `evaluate` never fails; the worst case is heuristic output flagged
/// `fallback: true`.
pub struct EvaluationService {
    evaluators: Vec<Arc<dyn Evaluator>>,
}

impl EvaluationService {
    pub fn new(evaluators: Vec<Arc<dyn Evaluator>>) -> Self {
        Self { evaluators }
    }

    /// Build the chain from whichever API keys resolved
    pub fn from_keys(mistral_key: Option<String>, openai_key: Option<String>) -> Self {
        let mut evaluators: Vec<Arc<dyn Evaluator>> = Vec::new();

        if let Some(key) = mistral_key {
            match ChatEvaluator::mistral(key) {
                Ok(client) => evaluators.push(Arc::new(client)),
                Err(e) => tracing::warn!("Mistral client unavailable: {}", e),
            }
        }
        if let Some(key) = openai_key {
            match ChatEvaluator::openai(key) {
                Ok(client) => evaluators.push(Arc::new(client)),
                Err(e) => tracing::warn!("OpenAI client unavailable: {}", e),
            }
        }

        if evaluators.is_empty() {
            tracing::info!("No LLM evaluators configured; heuristic scoring only");
        }

        Self::new(evaluators)
    }

    /// Score a transcript, degrading through the adapter chain
    pub async fn evaluate(&self, transcript: &str, prompt: &str) -> ScoreSet {
        if transcript.trim().is_empty() {
            return constant_fallback();
        }

        for evaluator in &self.evaluators {
            match evaluator.evaluate(transcript, prompt).await {
                Ok(scores) => {
                    tracing::info!(
                        adapter = evaluator.name(),
                        overall = scores.overall_score,
                        cefr = %scores.cefr_level,
                        "Evaluation completed"
                    );
                    return scores;
                }
                Err(e) => {
                    tracing::warn!(
                        adapter = evaluator.name(),
                        error = %e,
                        "Evaluation adapter failed, trying next"
                    );
                }
            }
        }

        heuristic_scores(transcript)
    }
}
