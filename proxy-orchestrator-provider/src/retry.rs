//! Retry with exponential backoff.
//!
//! Delay before retry `n` (1-based, counting failed attempts) is
//! `base * 2^(n-1)`, capped at `max_delay`. A `Retry-After` hint from a
//! rate-limited response replaces the computed delay, under the same cap.
//! The final error is returned unmodified once `max_attempts` is reached.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ProviderError, Result};

/// Default number of attempts (first call included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
/// Default delay after the first failure.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
/// Default ceiling for a single backoff sleep.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Backoff configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. `1` disables retrying.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Backoff delay after failed attempt number `attempt` (1-based).
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(20); // Prevent 2^n from overflowing
        self.base_delay
            .saturating_mul(1_u32 << exponent)
            .min(self.max_delay)
    }

    /// Delay to wait after `error` occurred on attempt `attempt`.
    fn delay_for(&self, error: &ProviderError, attempt: u32) -> Duration {
        match error.retry_after() {
            Some(secs) => Duration::from_secs(secs).min(self.max_delay),
            None => self.backoff_delay(attempt),
        }
    }
}

/// Something that can wait. Injected so tests never sleep for real.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// `policy.max_attempts` attempts have been made.
pub async fn call_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    operation_name: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts && e.is_retryable() => {
                let delay = policy.delay_for(&e, attempt);
                log::warn!(
                    "{operation_name} failed (attempt {attempt}/{max_attempts}), retrying in {:.1}s: {e}",
                    delay.as_secs_f32()
                );
                sleeper.sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                if e.is_retryable() {
                    log::error!("{operation_name} failed after {attempt} attempts: {e}");
                }
                return Err(e);
            }
        }
    }
}
