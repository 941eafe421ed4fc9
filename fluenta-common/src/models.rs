//! Domain models shared across Fluenta services
//!
//! Wire forms are camelCase JSON. Entity ids are auto-incrementing
//! integers assigned by the in-memory store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cefr::{CefrLevel, Difficulty};

/// Registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// Kind of speaking exercise a prompt asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptKind {
    ReadAloud,
    PictureDescription,
    TopicDiscussion,
    RolePlay,
}

/// Speaking test prompt, seeded at startup and immutable afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPrompt {
    pub id: i64,
    pub text: String,
    pub kind: PromptKind,
    pub difficulty: Difficulty,
    pub cefr_level: CefrLevel,
    pub tips: Vec<String>,
    pub resource_url: Option<String>,
    pub time_limit_seconds: u32,
}

/// Static test category reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCategory {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon: String,
}

/// Skill area a learning resource targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillArea {
    Vocabulary,
    Grammar,
    Fluency,
    Pronunciation,
    General,
}

impl std::str::FromStr for SkillArea {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vocabulary" => Ok(SkillArea::Vocabulary),
            "grammar" => Ok(SkillArea::Grammar),
            "fluency" => Ok(SkillArea::Fluency),
            "pronunciation" => Ok(SkillArea::Pronunciation),
            "general" => Ok(SkillArea::General),
            other => Err(crate::error::Error::InvalidInput(format!(
                "Unknown skill area: {}",
                other
            ))),
        }
    }
}

/// Static learning resource reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningResource {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub kind: String,
    pub skill: SkillArea,
    pub cefr_range: String,
}

/// Structured evaluation scores for one transcript
///
/// All five score fields are clamped to [0,100]. `fallback` is true when
/// the scores came from the heuristic or canned path rather than a hosted
/// LLM evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSet {
    pub overall_score: f64,
    pub vocabulary_score: f64,
    pub grammar_score: f64,
    pub fluency_score: f64,
    pub pronunciation_score: f64,
    pub cefr_level: CefrLevel,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub recommendations: Vec<String>,
    pub feedback: String,
    #[serde(default)]
    pub fallback: bool,
}

impl ScoreSet {
    /// Clamp every score field into [0,100]
    pub fn clamp_scores(&mut self) {
        self.overall_score = self.overall_score.clamp(0.0, 100.0);
        self.vocabulary_score = self.vocabulary_score.clamp(0.0, 100.0);
        self.grammar_score = self.grammar_score.clamp(0.0, 100.0);
        self.fluency_score = self.fluency_score.clamp(0.0, 100.0);
        self.pronunciation_score = self.pronunciation_score.clamp(0.0, 100.0);
    }

    /// True when every score field lies within [0,100]
    pub fn scores_in_bounds(&self) -> bool {
        [
            self.overall_score,
            self.vocabulary_score,
            self.grammar_score,
            self.fluency_score,
            self.pronunciation_score,
        ]
        .iter()
        .all(|s| (0.0..=100.0).contains(s))
    }
}

/// One recorded answer to one prompt, child of a TestResult
///
/// `result_id` is 0 until the submission is attached to a stored result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSubmission {
    pub id: i64,
    pub result_id: i64,
    pub prompt_id: i64,
    pub transcript: String,
    pub evaluation: Option<serde_json::Value>,
    pub audio_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-test aggregate result, owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub id: i64,
    pub user_id: i64,
    pub difficulty: Difficulty,
    pub overall_score: f64,
    pub vocabulary_score: f64,
    pub grammar_score: f64,
    pub fluency_score: f64,
    pub pronunciation_score: f64,
    pub cefr_level: CefrLevel,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub recommendations: Vec<String>,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

/// Per-user progress rollup
///
/// `highest_unlocked` only ever moves up the tier ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: i64,
    pub tests_completed: u32,
    pub average_score: f64,
    pub highest_unlocked: Difficulty,
    pub best_scores: BTreeMap<Difficulty, f64>,
}

impl UserProgress {
    /// Fresh progress record: nothing completed, beginner unlocked
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            tests_completed: 0,
            average_score: 0.0,
            highest_unlocked: Difficulty::Beginner,
            best_scores: BTreeMap::new(),
        }
    }
}
