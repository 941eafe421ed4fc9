//! User progress rollup and tier progression
//!
//! Completing a test at the currently unlocked tier with an overall score
//! at or above the unlock threshold advances the unlock to the next tier.
//! Expert is terminal. The unlock never moves down.

use fluenta_common::models::UserProgress;
use fluenta_common::Difficulty;
use tracing::info;

use super::Store;

/// Overall score required to unlock the next difficulty tier
pub const UNLOCK_THRESHOLD: f64 = 80.0;

impl Store {
    /// Fetch a user's progress, or a fresh default record when none exists
    pub async fn get_or_default_progress(&self, user_id: i64) -> UserProgress {
        self.progress
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| UserProgress::new(user_id))
    }

    /// Fold one completed test into the user's rollup
    ///
    /// Updates tests completed, the running average, the per-tier best
    /// score, and applies the unlock rule. Returns the updated record.
    pub async fn apply_result(
        &self,
        user_id: i64,
        difficulty: Difficulty,
        overall_score: f64,
    ) -> UserProgress {
        let mut map = self.progress.write().await;
        let entry = map
            .entry(user_id)
            .or_insert_with(|| UserProgress::new(user_id));

        let completed = entry.tests_completed as f64;
        entry.average_score =
            (entry.average_score * completed + overall_score) / (completed + 1.0);
        entry.tests_completed += 1;

        let best = entry.best_scores.entry(difficulty).or_insert(overall_score);
        if overall_score > *best {
            *best = overall_score;
        }

        if overall_score >= UNLOCK_THRESHOLD && difficulty == entry.highest_unlocked {
            if let Some(next) = difficulty.next() {
                entry.highest_unlocked = next;
                info!(
                    user_id = user_id,
                    unlocked = %next,
                    score = overall_score,
                    "Difficulty tier unlocked"
                );
            }
        }

        entry.clone()
    }
}
