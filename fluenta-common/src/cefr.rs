//! CEFR proficiency scale and test difficulty tiers
//!
//! The CEFR scale (A1 through C2) labels prompts and evaluation results.
//! Difficulty tiers gate which prompts a user may attempt; tiers unlock
//! monotonically as scores cross the unlock threshold.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// CEFR proficiency level, A1 (lowest) through C2 (highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    /// Map an overall score (0-100) onto the CEFR scale
    pub fn from_score(score: f64) -> Self {
        let score = score.clamp(0.0, 100.0);
        if score < 20.0 {
            CefrLevel::A1
        } else if score < 35.0 {
            CefrLevel::A2
        } else if score < 50.0 {
            CefrLevel::B1
        } else if score < 65.0 {
            CefrLevel::B2
        } else if score < 80.0 {
            CefrLevel::C1
        } else {
            CefrLevel::C2
        }
    }

    /// Human-readable label used in feedback text
    pub fn description(&self) -> &'static str {
        match self {
            CefrLevel::A1 => "Beginner",
            CefrLevel::A2 => "Elementary",
            CefrLevel::B1 => "Intermediate",
            CefrLevel::B2 => "Upper Intermediate",
            CefrLevel::C1 => "Advanced",
            CefrLevel::C2 => "Proficient",
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for CefrLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A1" => Ok(CefrLevel::A1),
            "A2" => Ok(CefrLevel::A2),
            "B1" => Ok(CefrLevel::B1),
            "B2" => Ok(CefrLevel::B2),
            "C1" => Ok(CefrLevel::C1),
            "C2" => Ok(CefrLevel::C2),
            other => Err(Error::InvalidInput(format!("Unknown CEFR level: {}", other))),
        }
    }
}

/// Test difficulty tier, ordered beginner through expert
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// Next tier up, or None from the terminal tier (expert)
    pub fn next(&self) -> Option<Difficulty> {
        match self {
            Difficulty::Beginner => Some(Difficulty::Intermediate),
            Difficulty::Intermediate => Some(Difficulty::Advanced),
            Difficulty::Advanced => Some(Difficulty::Expert),
            Difficulty::Expert => None,
        }
    }

    /// All tiers in unlock order
    pub fn all() -> [Difficulty; 4] {
        [
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Advanced,
            Difficulty::Expert,
        ]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            "expert" => Ok(Difficulty::Expert),
            other => Err(Error::InvalidInput(format!(
                "Unknown difficulty tier: {}",
                other
            ))),
        }
    }
}
