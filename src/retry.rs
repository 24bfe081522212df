//! Retry with exponential backoff for transient API failures

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::constants::{INITIAL_BACKOFF_MS, MAX_BACKOFF_MS, MAX_RETRY_ATTEMPTS};
use crate::error::ApiError;

/// Backoff policy applied between attempts
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Delay before the second attempt
    pub initial_backoff: Duration,

    /// Multiplier applied to the delay after each failed attempt
    pub backoff_factor: f64,

    /// Cap on the delay between attempts
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRY_ATTEMPTS,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
            backoff_factor: 2.0,
            max_backoff: Duration::from_millis(MAX_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    /// Delay applied after the given 1-based attempt fails
    ///
    /// Saturates at `max_backoff` once the exponential outgrows it,
    /// including when `initial * factor^(attempt-1)` no longer fits in
    /// a `Duration` at all.
    fn backoff_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let delay = self.initial_backoff.as_secs_f64() * self.backoff_factor.powi(exponent);
        Duration::try_from_secs_f64(delay)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

/// Runs `op`, retrying transient failures according to `policy`
///
/// Non-retryable errors and the error from the final attempt are
/// returned unchanged. See [`ApiError::is_retryable`] for what counts
/// as transient.
pub async fn run<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    for attempt in 1..=policy.max_attempts.max(1) {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if !e.is_retryable() || attempt >= policy.max_attempts {
                    return Err(e);
                }
                let backoff = policy.backoff_after(attempt);
                tracing::warn!(
                    attempt = attempt,
                    max_attempts = policy.max_attempts,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "Request failed, retrying"
                );
                sleep(backoff).await;
            }
        }
    }

    Err(ApiError::invalid_response("max retry attempts exceeded"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(10),
            backoff_factor: 2.0,
            max_backoff: Duration::from_millis(40),
        }
    }

    #[tokio::test]
    async fn test_succeeds_on_first_attempt() {
        let mut attempts = 0u32;
        let result = run(&fast_policy(), || {
            attempts += 1;
            async { Ok::<_, ApiError>(42) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn test_retries_transient_failures_until_success() {
        let mut attempts = 0u32;
        let result = run(&fast_policy(), || {
            attempts += 1;
            let n = attempts;
            async move {
                if n < 3 {
                    Err(ApiError::Timeout { seconds: 1 })
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let mut attempts = 0u32;
        let result: Result<(), _> = run(&fast_policy(), || {
            attempts += 1;
            async { Err(ApiError::RateLimited { retry_after: None }) }
        })
        .await;

        assert!(matches!(result, Err(ApiError::RateLimited { .. })));
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn test_non_retryable_errors_fail_immediately() {
        let mut attempts = 0u32;
        let result: Result<(), _> = run(&fast_policy(), || {
            attempts += 1;
            async { Err(ApiError::validation("bad input")) }
        })
        .await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn test_backoff_delays_accumulate() {
        let start = Instant::now();
        let result: Result<(), _> = run(&fast_policy(), || async {
            Err(ApiError::Timeout { seconds: 1 })
        })
        .await;

        assert!(result.is_err());
        // two sleeps: 10ms then 20ms
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = fast_policy();
        assert_eq!(policy.backoff_after(1), Duration::from_millis(10));
        assert_eq!(policy.backoff_after(2), Duration::from_millis(20));
        assert_eq!(policy.backoff_after(3), Duration::from_millis(40));
        // capped at max_backoff from here on
        assert_eq!(policy.backoff_after(4), Duration::from_millis(40));
        assert_eq!(policy.backoff_after(10), Duration::from_millis(40));
    }

    #[test]
    fn test_backoff_saturates_instead_of_overflowing() {
        let policy = RetryPolicy {
            max_attempts: 70,
            initial_backoff: Duration::from_secs(1),
            backoff_factor: 2.0,
            max_backoff: Duration::from_secs(30),
        };
        // 2^63 seconds still fits a Duration, 2^64 does not
        assert_eq!(policy.backoff_after(64), Duration::from_secs(30));
        assert_eq!(policy.backoff_after(65), Duration::from_secs(30));
        assert_eq!(policy.backoff_after(u32::MAX), Duration::from_secs(30));

        let shrinking = RetryPolicy {
            backoff_factor: -2.0,
            ..policy
        };
        assert_eq!(shrinking.backoff_after(2), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_runaway_backoff_still_returns_the_final_error() {
        let policy = RetryPolicy {
            max_attempts: 6,
            initial_backoff: Duration::from_secs(1),
            backoff_factor: 1e6,
            max_backoff: Duration::from_millis(1),
        };
        let mut attempts = 0u32;
        let result: Result<(), _> = run(&policy, || {
            attempts += 1;
            async { Err(ApiError::Timeout { seconds: 1 }) }
        })
        .await;

        assert!(matches!(result, Err(ApiError::Timeout { .. })));
        assert_eq!(attempts, 6);
    }

    #[test]
    fn test_default_policy_matches_constants() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, MAX_RETRY_ATTEMPTS);
        assert_eq!(policy.initial_backoff, Duration::from_millis(INITIAL_BACKOFF_MS));
        assert_eq!(policy.max_backoff, Duration::from_millis(MAX_BACKOFF_MS));
    }
}
