//! Bounded retry of connection-level failures.

use std::future::Future;
use std::time::Duration;

use crate::clients::errors::HttpError;
use crate::config::{ValenceConfig, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_INTERVAL};

/// How many times, and how far apart, a failed call is re-attempted.
///
/// A policy with `max_retries = n` makes at most `n + 1` attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of re-attempts after the first failure.
    pub max_retries: u32,
    /// Pause between attempts.
    pub interval: Duration,
}

impl RetryPolicy {
    /// Creates a new policy.
    #[must_use]
    pub const fn new(max_retries: u32, interval: Duration) -> Self {
        Self {
            max_retries,
            interval,
        }
    }

    /// Total number of attempts this policy allows.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_RETRY_INTERVAL)
    }
}

impl From<&ValenceConfig> for RetryPolicy {
    fn from(config: &ValenceConfig) -> Self {
        Self::new(config.max_retries(), config.retry_interval())
    }
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// the policy's attempts are used up.
///
/// Only [`HttpError::Connection`] is retried; error responses and validation
/// failures are returned immediately. After the last attempt the last error
/// is returned. Attempts run one after another on the calling task, and the
/// pause between them is a tokio timer, so dropping the returned future
/// cancels the loop.
///
/// # Errors
///
/// Returns the error of the last attempt.
///
/// # Example
///
/// ```rust,ignore
/// let policy = RetryPolicy::new(3, Duration::from_secs(1));
/// let response = with_retries(policy, || client.request(&request)).await?;
/// ```
pub async fn with_retries<F, Fut, T>(policy: RetryPolicy, mut operation: F) -> Result<T, HttpError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, HttpError>>,
{
    let total = policy.attempts();
    let mut attempt: u32 = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_retryable() && attempt < total => {
                tracing::debug!(
                    "Error contacting Valence server: {}. Attempt {} of {}",
                    error,
                    attempt,
                    total
                );
                tokio::time::sleep(policy.interval).await;
                attempt += 1;
            }
            Err(error) => {
                if error.is_retryable() {
                    tracing::error!(
                        "Error contacting Valence server: {}. Attempt {} of {}",
                        error,
                        attempt,
                        total
                    );
                }
                return Err(error);
            }
        }
    }
}
