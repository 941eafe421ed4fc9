//! Test submission store operations
//!
//! A submission always references an existing prompt; callers validate the
//! prompt id before inserting. `result_id` 0 marks a submission not yet
//! attached to a stored result.

use chrono::Utc;
use fluenta_common::models::TestSubmission;

use super::Store;

impl Store {
    /// Insert a submission, assigning its id and creation timestamp
    pub async fn insert_submission(
        &self,
        result_id: i64,
        prompt_id: i64,
        transcript: String,
        evaluation: Option<serde_json::Value>,
        audio_url: Option<String>,
    ) -> TestSubmission {
        let submission = TestSubmission {
            id: Self::next_id(&self.next_submission_id),
            result_id,
            prompt_id,
            transcript,
            evaluation,
            audio_url,
            created_at: Utc::now(),
        };
        self.submissions
            .write()
            .await
            .insert(submission.id, submission.clone());
        submission
    }

    /// Fetch a submission by id
    pub async fn get_submission(&self, id: i64) -> Option<TestSubmission> {
        self.submissions.read().await.get(&id).cloned()
    }

    /// Submissions attached to one result, ordered by id
    pub async fn submissions_for_result(&self, result_id: i64) -> Vec<TestSubmission> {
        let mut submissions: Vec<TestSubmission> = self
            .submissions
            .read()
            .await
            .values()
            .filter(|s| s.result_id == result_id)
            .cloned()
            .collect();
        submissions.sort_by_key(|s| s.id);
        submissions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_submissions_group_by_result() {
        let store = Store::new();

        let a = store
            .insert_submission(1, 10, "first answer".into(), None, None)
            .await;
        let b = store
            .insert_submission(1, 11, "second answer".into(), None, None)
            .await;
        store
            .insert_submission(2, 10, "other result".into(), None, None)
            .await;

        let for_one = store.submissions_for_result(1).await;
        assert_eq!(
            for_one.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![a.id, b.id]
        );
        assert_eq!(store.submissions_for_result(99).await.len(), 0);
        assert!(store.get_submission(a.id).await.is_some());
    }
}
