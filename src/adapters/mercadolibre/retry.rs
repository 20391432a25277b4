//! Exponential backoff schedule for transient provider failures.

use std::time::Duration;

/// Retry budget and backoff bounds for one logical request.
///
/// A request is attempted `max_retries + 1` times at most. The wait before
/// attempt `k` (k ≥ 1) is `initial_backoff × 2^(k-1)`, capped at
/// `max_backoff`. The first attempt never waits.
///
/// ```
/// use std::time::Duration;
/// use mercadolibre_sdk::adapters::mercadolibre::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.backoff_before_attempt(0), Duration::ZERO);
/// assert_eq!(policy.backoff_before_attempt(3), Duration::from_millis(400));
/// assert_eq!(policy.backoff_before_attempt(10), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (default: 3)
    pub max_retries: u32,
    /// Wait before the first retry (default: 100ms)
    pub initial_backoff: Duration,
    /// Upper bound on any single wait (default: 5s)
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff,
            max_backoff,
        }
    }

    /// A policy that performs exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Total attempts allowed, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Wait inserted before `attempt` (zero-based). Saturates at `max_backoff`.
    pub fn backoff_before_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        1u32.checked_shl(attempt - 1)
            .and_then(|factor| self.initial_backoff.checked_mul(factor))
            .map_or(self.max_backoff, |delay| delay.min(self.max_backoff))
    }
}
