use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use sqlx::SqlitePool;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Seconds until the oldest counted attempt falls out of the window.
    pub retry_after: Option<u64>,
}

impl RateLimitDecision {
    fn allowed() -> Self {
        Self {
            allowed: true,
            retry_after: None,
        }
    }
}

/// Sliding-window attempt counter keyed by an opaque identifier (an IP for
/// anonymous flows, a username for login). Counts are approximate under
/// concurrency; exact exclusion is not required.
#[derive(Clone)]
pub struct RateLimiter {
    max_attempts: usize,
    window: Duration,
    attempts: Arc<Mutex<HashMap<String, Vec<Instant>>>>,
}

impl RateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check whether the identifier is still under the limit. Lazily evicts
    /// stale timestamps for the checked key and drops fully-stale keys.
    pub fn check(&self, identifier: &str) -> RateLimitDecision {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        // checked_sub: the monotonic clock may be younger than the window.
        let cutoff = now.checked_sub(self.window);

        let Some(timestamps) = map.get_mut(identifier) else {
            return RateLimitDecision::allowed();
        };
        if let Some(cutoff) = cutoff {
            timestamps.retain(|t| *t > cutoff);
        }
        if timestamps.is_empty() {
            map.remove(identifier);
            return RateLimitDecision::allowed();
        }

        if timestamps.len() >= self.max_attempts {
            let oldest = timestamps.iter().min().copied().unwrap_or(now);
            let remaining = self.window.saturating_sub(now.duration_since(oldest));
            RateLimitDecision {
                allowed: false,
                retry_after: Some(remaining.as_secs().max(1)),
            }
        } else {
            RateLimitDecision::allowed()
        }
    }

    /// Record one attempt for the identifier.
    pub fn record(&self, identifier: &str) {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(identifier.to_string())
            .or_default()
            .push(Instant::now());
    }

    /// Clear all recorded attempts (call on successful login).
    pub fn clear(&self, identifier: &str) {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(identifier);
    }
}

/// Persist one login attempt for audit purposes. Best-effort: a storage
/// failure is logged and never propagated to the caller's login flow.
pub async fn record_login_attempt(
    pool: &SqlitePool,
    identifier: &str,
    success: bool,
    user_id: Option<i64>,
) {
    let result = sqlx::query(
        "INSERT INTO login_attempts (identifier, success, user_id) VALUES (?, ?, ?)",
    )
    .bind(identifier)
    .bind(success)
    .bind(user_id)
    .execute(pool)
    .await;

    if let Err(e) = result {
        log::warn!("Failed to record login attempt for {identifier}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_threshold() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..2 {
            limiter.record("1.2.3.4");
        }
        // Third attempt (threshold-th) is still allowed.
        assert!(limiter.check("1.2.3.4").allowed);
        limiter.record("1.2.3.4");
        let decision = limiter.check("1.2.3.4");
        assert!(!decision.allowed);
        assert!(decision.retry_after.is_some());
    }

    #[test]
    fn identifiers_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        limiter.record("a");
        assert!(!limiter.check("a").allowed);
        assert!(limiter.check("b").allowed);
    }

    #[test]
    fn clear_resets_counter() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        limiter.record("a");
        assert!(!limiter.check("a").allowed);
        limiter.clear("a");
        assert!(limiter.check("a").allowed);
    }

    #[test]
    fn attempts_expire_after_window() {
        let limiter = RateLimiter::new(1, Duration::from_millis(10));
        limiter.record("a");
        std::thread::sleep(Duration::from_millis(20));
        assert!(limiter.check("a").allowed);
    }
}
