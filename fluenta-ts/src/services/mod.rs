//! Hosted AI service adapters
//!
//! - `transcriber`: AssemblyAI speech-to-text client
//! - `evaluator`: LLM scoring adapters (Mistral, OpenAI) with heuristic
//!   fallback

pub mod evaluator;
pub mod transcriber;

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Minimum-interval rate limiter shared by upstream clients
pub(crate) struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub(crate) fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    pub(crate) async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Upstream rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}
