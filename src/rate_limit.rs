use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::error::ApiError;

const MINUTE_MS: f64 = 60_000.0;

/// The mutating operations that consume rate-limit tokens. Reads are free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    CreateTask,
    UpdateTask,
    DeleteTask,
    CreateTag,
    UpdateTag,
    DeleteTag,
    UpdatePreferences,
}

impl Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::CreateTask => "create_task",
            Op::UpdateTask => "update_task",
            Op::DeleteTask => "delete_task",
            Op::CreateTag => "create_tag",
            Op::UpdateTag => "update_tag",
            Op::DeleteTag => "delete_tag",
            Op::UpdatePreferences => "update_preferences",
        }
    }

    /// Per-operation budget: sustained tokens per minute, and how many a
    /// fresh bucket holds (the burst allowance).
    fn budget(&self) -> (f64, f64) {
        match self {
            Op::CreateTask => (30.0, 5.0),
            Op::UpdateTask => (60.0, 10.0),
            Op::DeleteTask => (20.0, 3.0),
            Op::CreateTag => (20.0, 3.0),
            Op::UpdateTag => (30.0, 5.0),
            Op::DeleteTag => (20.0, 3.0),
            Op::UpdatePreferences => (10.0, 2.0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Bucket {
    tokens: f64,
    updated_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Allowed,
    Denied { retry_after: Duration },
}

/// Token-bucket limiter keyed by operation and user id.
///
/// Buckets refill continuously rather than on a window boundary, so a
/// caller who drains the burst allowance gets one token back every
/// `60s / rate` instead of waiting for the next minute.
pub struct RateLimiter {
    started: Instant,
    buckets: Mutex<HashMap<(Op, String), Bucket>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        RateLimiter {
            started: Instant::now(),
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Takes one token for `key`, or fails with the rate-limit error the
    /// client sees.
    pub async fn check(&self, op: Op, key: &str) -> Result<(), ApiError> {
        let now_ms = self.started.elapsed().as_millis() as u64;
        match self.check_at(op, key, now_ms).await {
            Decision::Allowed => Ok(()),
            Decision::Denied { retry_after } => {
                log::warn!("rate limit hit: op={} key={}", op.as_str(), key);
                Err(ApiError::RateLimited { retry_after })
            }
        }
    }

    /// Clock-explicit variant of [`check`](Self::check); `now_ms` only has
    /// to be monotonic per key.
    pub async fn check_at(&self, op: Op, key: &str, now_ms: u64) -> Decision {
        let (rate, capacity) = op.budget();
        let mut buckets = self.buckets.lock().await;
        let bucket = buckets.entry((op, key.to_string())).or_insert(Bucket {
            tokens: capacity,
            updated_ms: now_ms,
        });

        let elapsed_ms = now_ms.saturating_sub(bucket.updated_ms);
        bucket.tokens = (bucket.tokens + elapsed_ms as f64 * rate / MINUTE_MS).min(capacity);
        bucket.updated_ms = now_ms;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Decision::Allowed
        } else {
            // a denied call consumes nothing
            let deficit = 1.0 - bucket.tokens;
            let retry_ms = (deficit * MINUTE_MS / rate).ceil() as u64;
            Decision::Denied {
                retry_after: Duration::from_millis(retry_ms),
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
