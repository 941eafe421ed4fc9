//! Test prompt store operations
//!
//! Prompts are seeded at startup and immutable afterwards; there is no
//! public insert path.

use fluenta_common::models::TestPrompt;
use fluenta_common::Difficulty;

use super::Store;

impl Store {
    /// Insert a seeded prompt, assigning its id
    pub(crate) async fn insert_prompt(&self, mut prompt: TestPrompt) -> TestPrompt {
        prompt.id = Self::next_id(&self.next_prompt_id);
        self.prompts.write().await.insert(prompt.id, prompt.clone());
        prompt
    }

    /// All prompts, ordered by id
    pub async fn all_prompts(&self) -> Vec<TestPrompt> {
        let mut prompts: Vec<TestPrompt> = self.prompts.read().await.values().cloned().collect();
        prompts.sort_by_key(|p| p.id);
        prompts
    }

    /// Prompts for one difficulty tier, ordered by id
    pub async fn prompts_by_difficulty(&self, difficulty: Difficulty) -> Vec<TestPrompt> {
        let mut prompts: Vec<TestPrompt> = self
            .prompts
            .read()
            .await
            .values()
            .filter(|p| p.difficulty == difficulty)
            .cloned()
            .collect();
        prompts.sort_by_key(|p| p.id);
        prompts
    }

    /// Fetch a prompt by id
    pub async fn get_prompt(&self, id: i64) -> Option<TestPrompt> {
        self.prompts.read().await.get(&id).cloned()
    }
}
