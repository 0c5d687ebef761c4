//! Fixed-delay retry policy.
//!
//! The delay between attempts is constant. Total run time under a degraded
//! network is `attempts × (timeout + delay)` per call.

use std::future::Future;
use std::time::Duration;

use crate::error::ProbeError;

/// Configuration for the retry policy.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the first try).
    pub max_retries: u32,
    /// Sleep between attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// Stateless retry policy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Total attempts including the first.
    pub fn max_attempts(&self) -> u32 {
        self.config.max_retries.saturating_add(1)
    }

    /// Returns the delay before the retry that follows the `attempt`-th
    /// failure (1-based), or `None` once retries are spent.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        (attempt <= self.config.max_retries).then_some(self.config.delay)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempts run out. `op` receives the 1-based attempt number.
    ///
    /// Once the attempts run out the last error is returned inside
    /// [`ProbeError::Exhausted`].
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, ProbeError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ProbeError>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => match self.next_delay(attempt) {
                    Some(delay) => {
                        tracing::warn!(
                            attempt,
                            max_attempts = self.max_attempts(),
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            method = label,
                            "retrying request"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        tracing::error!(attempt, error = %e, method = label, "max retries exceeded");
                        return Err(ProbeError::Exhausted {
                            attempts: attempt,
                            last: Box::new(e),
                        });
                    }
                },
                Err(e) => return Err(e),
            }
        }
    }
}
