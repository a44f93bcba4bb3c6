//! Bounded retry with linear backoff for calls to external collaborators.

use std::future::Future;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_RETRY;

/// Errors that know whether repeating the failed call may succeed.
pub trait Retryable {
    /// Returns true if this error indicates a temporary failure.
    fn is_retryable(&self) -> bool;

    /// Returns the delay suggested by the remote side, if any.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Retry settings shared by the model, scraper and publish clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct RetryConfig {
    /// Maximum number of retries after the first failed attempt.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "RETRY_MAX_RETRIES", default_value_t = 2)
    )]
    pub max_retries: u32,

    /// Base backoff in milliseconds; attempt `n` waits `n * backoff`.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "RETRY_BACKOFF_MS", default_value_t = 500)
    )]
    pub retry_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

/// Bounded retry policy.
///
/// The first attempt runs immediately. Every retryable failure is followed by
/// a sleep of `backoff * attempt` (or the error's own `retry_after`), until
/// `max_retries` retries have been spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff: Duration,
}

impl RetryPolicy {
    /// Creates a new retry policy.
    pub const fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// A policy that never retries.
    pub const fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Returns the maximum number of retries.
    #[inline]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the base backoff.
    #[inline]
    pub const fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Runs `operation` until it succeeds, fails permanently, or retries run out.
    pub async fn run<T, E, F, Fut>(&self, name: &str, mut operation: F) -> Result<T, E>
    where
        E: Retryable + std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::info!(
                            target: TRACING_TARGET_RETRY,
                            operation = name,
                            attempt = attempt + 1,
                            "request succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = e.retry_after().unwrap_or(self.backoff * attempt);

                    tracing::warn!(
                        target: TRACING_TARGET_RETRY,
                        operation = name,
                        attempt = attempt,
                        max_retries = self.max_retries,
                        backoff_ms = delay.as_millis() as u64,
                        error = %e,
                        "request failed, retrying"
                    );

                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(
                        target: TRACING_TARGET_RETRY,
                        operation = name,
                        attempt = attempt + 1,
                        error = %e,
                        "request failed permanently"
                    );
                    return Err(e);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryConfig::default().into()
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.retry_backoff_ms),
        )
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        config.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[derive(Debug)]
    struct TestError {
        retryable: bool,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "test error (retryable: {})", self.retryable)
        }
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            self.retryable
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let calls = &AtomicU32::new(0);
        let policy = RetryPolicy::new(2, Duration::from_millis(100));

        let result = policy
            .run("test", || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(TestError { retryable: true })
                } else {
                    Ok(n)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_retries() {
        let calls = &AtomicU32::new(0);
        let policy = RetryPolicy::new(2, Duration::from_millis(100));

        let result: Result<(), _> = policy
            .run("test", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TestError { retryable: true })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried() {
        let calls = &AtomicU32::new(0);
        let policy = RetryPolicy::default();

        let result: Result<(), _> = policy
            .run("test", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TestError { retryable: false })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn policy_from_config() {
        let policy = RetryPolicy::from(RetryConfig {
            max_retries: 4,
            retry_backoff_ms: 250,
        });
        assert_eq!(policy.max_retries(), 4);
        assert_eq!(policy.backoff(), Duration::from_millis(250));
        assert_eq!(RetryPolicy::none().max_retries(), 0);
    }
}
