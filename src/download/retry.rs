//! Retry logic for file downloads.
//!
//! Attempt `n` (counting from 1) that fails with a retryable error is followed
//! by a wait of `n * backoff`, or the server's `Retry-After` if that is longer.

use std::future::Future;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};

/// How often and how patiently to retry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Always at least 1.
    pub attempts: u32,
    /// Base wait between attempts.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, backoff: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            backoff,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.download_retry_attempts, config.retry_backoff())
    }

    /// Wait after failed attempt number `attempt`.
    pub fn delay_for(&self, attempt: u32, error: &Error) -> Duration {
        let linear = self.backoff.saturating_mul(attempt);
        match error {
            Error::RateLimited(secs) => linear.max(Duration::from_secs(*secs)),
            _ => linear,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

/// Run `operation` until it succeeds, fails permanently, or attempts run out.
pub async fn download_with_retry<F, Fut, T>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::debug!(attempts = attempt, "Download succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if e.is_retryable() && attempt < policy.attempts => {
                let delay = policy.delay_for(attempt, &e);

                tracing::warn!(
                    error = %e,
                    attempt = attempt,
                    max_attempts = policy.attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Download failed, retrying"
                );

                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = download_with_retry(&fast_policy(3), || {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(Error::Server(502))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<()> = download_with_retry(&fast_policy(2), || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(Error::Download("connection reset".into()))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<()> = download_with_retry(&fast_policy(5), || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(Error::Api("Failed to download file: HTTP 404".into()))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_linear_backoff() {
        let policy = RetryPolicy::new(3, Duration::from_secs(2));
        let err = Error::Server(500);
        assert_eq!(policy.delay_for(1, &err), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2, &err), Duration::from_secs(4));
        assert_eq!(
            policy.delay_for(1, &Error::RateLimited(30)),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_huge_backoff_does_not_overflow() {
        let policy = RetryPolicy::new(5, Duration::MAX);
        assert_eq!(policy.delay_for(3, &Error::Server(500)), Duration::MAX);

        let config = Config::from_yaml("download_retry_backoff_seconds: 1e30\n").unwrap();
        let policy = RetryPolicy::from_config(&config);
        assert_eq!(policy.backoff, Duration::from_secs(3600));
    }

    #[test]
    fn test_zero_attempts_clamped() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).attempts, 1);
    }
}
