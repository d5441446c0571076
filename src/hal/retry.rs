//! Bounded retry with exponential backoff.
//!
//! Bulk collection operations retry transient remote failures (HTTP
//! status 500 or above). The policy is explicit data, an attempt budget
//! plus base delay, consumed by the generic [`with_retry`] helper, so callers and
//! tests can substitute their own pacing.

use std::future::Future;
use std::time::Duration;

use crate::hal::errors::ResourceError;

/// Retry pacing for bulk operations.
///
/// An operation is attempted up to `max_attempts` times in total; after
/// the n-th failed attempt (n starting at 0) the helper waits
/// `base_delay * 2^n` before trying again.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use hal_client::hal::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts(), 8);
/// assert_eq!(policy.backoff(0), Duration::from_secs(1));
/// assert_eq!(policy.backoff(3), Duration::from_secs(8));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given total attempt budget and base delay.
    #[must_use]
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Returns the total attempt budget (first try included).
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the delay before the retry following failed attempt `attempt`.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

impl Default for RetryPolicy {
    /// One initial attempt plus seven retries, starting at one second.
    fn default() -> Self {
        Self::new(8, Duration::from_secs(1))
    }
}

/// Returns `true` for failures worth retrying: remote errors with an
/// HTTP-style status of 500 or above. Client errors (4xx) and all local
/// errors propagate immediately.
#[must_use]
pub fn is_transient(error: &ResourceError) -> bool {
    error.status().is_some_and(|status| status >= 500)
}

/// Runs `operation` until it succeeds, the failure is not retryable, or
/// the policy's attempt budget is exhausted.
///
/// The last failure is propagated unchanged.
///
/// # Errors
///
/// Returns the operation's error when `should_retry` rejects it or the
/// budget runs out.
///
/// # Example
///
/// ```rust,ignore
/// use hal_client::hal::{is_transient, with_retry, RetryPolicy};
///
/// let page = with_retry(&RetryPolicy::default(), is_transient, || {
///     list.follow_next_link()
/// })
/// .await?;
/// ```
pub async fn with_retry<T, F, Fut, P>(
    policy: &RetryPolicy,
    should_retry: P,
    mut operation: F,
) -> Result<T, ResourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ResourceError>>,
    P: Fn(&ResourceError) -> bool,
{
    let mut attempt: u32 = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt + 1 >= policy.max_attempts() || !should_retry(&error) {
                    return Err(error);
                }
                let delay = policy.backoff(attempt);
                tracing::warn!(
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %error,
                    "transient failure, backing off before retry"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
