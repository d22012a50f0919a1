// Retry logic with Retry-After hint support
// Author: kelexine (https://github.com/kelexine)

use backoff::{backoff::Backoff, ExponentialBackoff};
use std::time::Duration;
use tracing::debug;

/// Longest wait honored from an upstream hint.
const MAX_HINTED_DELAY: Duration = Duration::from_secs(60);

/// What the retry loop needs to know about a failed attempt.
pub trait RetryHint {
    /// Whether another attempt could plausibly succeed.
    fn is_transient(&self) -> bool;

    /// Upstream-suggested wait before the next attempt.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Parse a `Retry-After` header given in seconds ("40", "1.5").
/// HTTP-date values are ignored. Capped at 60 seconds.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(Duration::from_secs_f64(seconds).min(MAX_HINTED_DELAY))
}

/// Create exponential backoff configuration for retries
pub fn create_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        current_interval: Duration::from_millis(500),     // Start at 500ms
        initial_interval: Duration::from_millis(500),
        randomization_factor: 0.3,                         // Add jitter
        multiplier: 2.0,                                  // Double each time
        max_interval: Duration::from_secs(10),
        max_elapsed_time: Some(Duration::from_secs(60)),
        ..Default::default()
    }
}

/// Determine if an HTTP status code is retryable
pub fn is_retryable(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Run `operation` up to `max_attempts` times.
///
/// With `max_attempts <= 1` the operation runs exactly once. Non-transient
/// failures are returned immediately.
pub async fn with_retry<F, Fut, T, E>(
    operation_name: &str,
    max_attempts: u32,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: RetryHint,
{
    let max_attempts = max_attempts.max(1);
    let mut backoff = create_backoff();
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(failure) => {
                if !failure.is_transient() || attempt >= max_attempts {
                    return Err(failure);
                }

                let delay = match failure.retry_after() {
                    Some(hinted) => hinted,
                    None => match backoff.next_backoff() {
                        Some(delay) => delay,
                        // Backoff budget exhausted
                        None => return Err(failure),
                    },
                };

                debug!(
                    "{} failed (attempt {}/{}), retrying after {}ms",
                    operation_name,
                    attempt,
                    max_attempts,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct Failure {
        transient: bool,
    }

    impl RetryHint for Failure {
        fn is_transient(&self) -> bool {
            self.transient
        }

        fn retry_after(&self) -> Option<Duration> {
            Some(Duration::from_millis(1))
        }
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after("40").unwrap().as_secs(), 40);
        assert_eq!(parse_retry_after("1.5").unwrap().as_millis(), 1500);
        assert_eq!(parse_retry_after("120").unwrap().as_secs(), 60);
        assert!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT").is_none());
        assert!(parse_retry_after("-1").is_none());
    }

    #[test]
    fn test_is_retryable() {
        assert!(is_retryable(429));
        assert!(is_retryable(503));
        assert!(!is_retryable(400));
        assert!(!is_retryable(401));
    }

    #[tokio::test]
    async fn test_single_attempt_by_default() {
        let calls = AtomicU32::new(0);
        let result: Result<(), Failure> = with_retry("test", 1, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Failure { transient: true })
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, Failure> = with_retry("test", 2, || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Err(Failure { transient: true })
            } else {
                Ok(n)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), Failure> = with_retry("test", 3, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Failure { transient: false })
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
