//! Re-issues read requests that failed for transport reasons.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::error::Retryable;

/// Linear backoff: attempt `n` waits `backoff * n` before the next try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries.
    pub const NONE: RetryPolicy = RetryPolicy {
        max_attempts: 1,
        backoff: Duration::ZERO,
    };

    /// Wait after failed attempt `attempt`. Saturates at `Duration::MAX`.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }

    /// Runs `request` until it succeeds, fails with a non-retryable error, or the attempts
    /// run out. The last error is returned.
    pub async fn run<F, Fut, T, E>(&self, operation: &'static str, mut request: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        let mut attempt = 1;
        loop {
            match request().await {
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    warn!(operation, attempt, error = %e, "Retrying");
                    tokio::time::sleep(self.delay(attempt)).await;
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, thiserror::Error)]
    enum Flaky {
        #[error("down")]
        Down,
        #[error("denied")]
        Denied,
    }

    fn fast() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            backoff: Duration::from_millis(1),
        }
    }

    impl Retryable for Flaky {
        fn is_retryable(&self) -> bool {
            matches!(self, Flaky::Down)
        }
    }

    #[test]
    fn test_delay_is_linear_and_saturates() {
        assert_eq!(fast().delay(3), Duration::from_millis(3));
        let huge = RetryPolicy {
            max_attempts: 10,
            backoff: Duration::from_millis(u64::MAX),
        };
        assert_eq!(huge.delay(2), Duration::MAX);
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let calls = &AtomicU32::new(0);
        let result = fast()
            .run("get", move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(Flaky::Down)
                } else {
                    Ok("order_1")
                }
            })
            .await;
        assert_eq!(result.unwrap(), "order_1");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), _> = fast()
            .run("get", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Flaky::Down)
            })
            .await;
        assert!(matches!(result, Err(Flaky::Down)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_never_retries_permission_errors() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), _> = fast()
            .run("get", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Flaky::Denied)
            })
            .await;
        assert!(matches!(result, Err(Flaky::Denied)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
