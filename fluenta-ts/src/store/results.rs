//! Test result store operations

use fluenta_common::models::TestResult;

use super::Store;

impl Store {
    /// Insert a result, assigning its id; scores must already be clamped
    pub async fn insert_result(&self, mut result: TestResult) -> TestResult {
        result.id = Self::next_id(&self.next_result_id);
        self.results.write().await.insert(result.id, result.clone());
        result
    }

    /// Fetch a result by id
    pub async fn get_result(&self, id: i64) -> Option<TestResult> {
        self.results.read().await.get(&id).cloned()
    }

    /// All results for one user, ordered by id
    pub async fn results_for_user(&self, user_id: i64) -> Vec<TestResult> {
        let mut results: Vec<TestResult> = self
            .results
            .read()
            .await
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        results.sort_by_key(|r| r.id);
        results
    }
}
