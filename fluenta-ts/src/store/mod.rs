//! In-memory entity store
//!
//! One map per entity, keyed by auto-incrementing integer id. Maps are
//! guarded by `tokio::sync::RwLock` so the store is safe to share across
//! handler tasks; id counters are atomics and never reused.
//!
//! Operation modules follow a function-per-operation layout, one module
//! per entity.

pub mod categories;
pub mod progress;
pub mod prompts;
pub mod resources;
pub mod results;
pub mod seed;
pub mod submissions;
pub mod users;

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use fluenta_common::models::{
    LearningResource, TestCategory, TestPrompt, TestResult, TestSubmission, User, UserProgress,
};

/// Shared in-memory store for all Fluenta entities
pub struct Store {
    users: RwLock<HashMap<i64, User>>,
    prompts: RwLock<HashMap<i64, TestPrompt>>,
    categories: RwLock<HashMap<i64, TestCategory>>,
    resources: RwLock<HashMap<i64, LearningResource>>,
    submissions: RwLock<HashMap<i64, TestSubmission>>,
    results: RwLock<HashMap<i64, TestResult>>,
    /// Keyed by user id (one rollup per user)
    progress: RwLock<HashMap<i64, UserProgress>>,

    next_user_id: AtomicI64,
    next_prompt_id: AtomicI64,
    next_category_id: AtomicI64,
    next_resource_id: AtomicI64,
    next_submission_id: AtomicI64,
    next_result_id: AtomicI64,
}

impl Store {
    /// Create an empty store; ids start at 1
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            prompts: RwLock::new(HashMap::new()),
            categories: RwLock::new(HashMap::new()),
            resources: RwLock::new(HashMap::new()),
            submissions: RwLock::new(HashMap::new()),
            results: RwLock::new(HashMap::new()),
            progress: RwLock::new(HashMap::new()),
            next_user_id: AtomicI64::new(1),
            next_prompt_id: AtomicI64::new(1),
            next_category_id: AtomicI64::new(1),
            next_resource_id: AtomicI64::new(1),
            next_submission_id: AtomicI64::new(1),
            next_result_id: AtomicI64::new(1),
        }
    }

    fn next_id(counter: &AtomicI64) -> i64 {
        counter.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
