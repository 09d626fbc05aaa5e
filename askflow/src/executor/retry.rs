//! Retry policy with a linearly growing backoff.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for stage retry behavior.
///
/// One shared, read-only policy covers every stage. The delay before the
/// attempt after `attempt_index` is `base_delay_ms * (attempt_index + 1)`:
/// linear growth, not a doubling schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum generation attempts per stage (including the first).
    pub max_attempts: usize,
    /// Base delay between attempts in milliseconds.
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 5000,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the base delay.
    #[must_use]
    pub fn with_base_delay_ms(mut self, delay: u64) -> Self {
        self.base_delay_ms = delay;
        self
    }

    /// Returns the delay to sleep after the attempt at `attempt_index`.
    #[must_use]
    pub fn delay_for(&self, attempt_index: usize) -> Duration {
        let factor = u64::try_from(attempt_index).unwrap_or(u64::MAX).saturating_add(1);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}
