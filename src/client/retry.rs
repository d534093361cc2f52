//! Retry policy for proxy requests
//!
//! The policy is explicit rather than inherited from a library default: a
//! bounded number of retries with capped exponential backoff, and only for
//! failures that can plausibly succeed on a second try (see
//! [`crate::error::FetchError::is_retryable`]).

use std::time::Duration;

use rand::Rng;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::Fetcher;
use crate::error::Result;
use crate::query::ResourceRequest;

pub const DEFAULT_MAX_RETRIES: u32 = 1;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry; doubles per attempt
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Spread each delay by up to ±10%
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Un-jittered delay before retry number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let delay = self.delay_for(attempt);
        if !self.jitter || delay.is_zero() {
            return delay;
        }
        let spread = rand::thread_rng().gen_range(0.9..=1.1);
        delay.mul_f64(spread)
    }
}

/// Issue `request`, retrying per `policy`
pub async fn fetch_with_retry(
    fetcher: &dyn Fetcher,
    request: &ResourceRequest,
    policy: &RetryPolicy,
) -> Result<Value> {
    let mut attempt = 0;
    loop {
        match fetcher.get_json(request).await {
            Ok(body) => return Ok(body),
            Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = policy.backoff(attempt);
                warn!(
                    request = %request,
                    error = %e,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "request failed, retrying"
                );
                sleep(delay).await;
            }
            Err(e) => {
                debug!(request = %request, error = %e, attempts = attempt + 1, "giving up");
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays a fixed sequence of outcomes, then keeps returning the last one
    struct Scripted {
        outcomes: Mutex<Vec<Result<Value>>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(mut outcomes: Vec<Result<Value>>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: Mutex::new(outcomes),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Fetcher for Scripted {
        async fn get_json(&self, _request: &ResourceRequest) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut outcomes = self.outcomes.lock().unwrap();
            if outcomes.len() > 1 {
                outcomes.pop().unwrap()
            } else {
                outcomes.last().cloned().unwrap()
            }
        }
    }

    fn fast(max_retries: u32) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_retries(max_retries)
            .with_base_delay(Duration::ZERO)
    }

    fn request() -> ResourceRequest {
        ResourceRequest::get("/countries/")
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy::default().without_jitter();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(10), Duration::from_secs(30));
        assert_eq!(policy.delay_for(64), Duration::from_secs(30));
    }

    #[test]
    fn test_jitter_stays_within_ten_percent() {
        let policy = RetryPolicy::default();
        for _ in 0..50 {
            let d = policy.backoff(1);
            assert!(d >= Duration::from_millis(900) && d <= Duration::from_millis(1100));
        }
    }

    #[tokio::test]
    async fn test_retries_transient_failure_once() {
        let fetcher = Scripted::new(vec![
            Err(FetchError::Network("connection reset".into())),
            Ok(json!({ "ok": true })),
        ]);
        let body = fetch_with_retry(&fetcher, &request(), &fast(1)).await.unwrap();
        assert_eq!(body, json!({ "ok": true }));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let fetcher = Scripted::new(vec![Err(FetchError::Status {
            status: 503,
            detail: "unavailable".into(),
        })]);
        let err = fetch_with_retry(&fetcher, &request(), &fast(1)).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_timeout_is_final() {
        let fetcher = Scripted::new(vec![Err(FetchError::Timeout(Duration::from_secs(30)))]);
        let err = fetch_with_retry(&fetcher, &request(), &fast(3)).await.unwrap_err();
        assert_eq!(err, FetchError::Timeout(Duration::from_secs(30)));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let fetcher = Scripted::new(vec![Err(FetchError::Status {
            status: 404,
            detail: "CEP não encontrado".into(),
        })]);
        let err = fetch_with_retry(&fetcher, &request(), &fast(3)).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_retry_policy() {
        let fetcher = Scripted::new(vec![Err(FetchError::Network("refused".into()))]);
        let _ = fetch_with_retry(&fetcher, &request(), &RetryPolicy::none()).await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }
}
