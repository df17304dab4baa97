//! Backoff policies for polling and retrying remote calls.

use std::time::Duration;

/// Exponential backoff with a per-delay cap and a bounded number of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound for a single delay.
    pub max_delay: Duration,
    /// Total attempts, including the first one.
    pub max_attempts: u32,
}

impl Backoff {
    /// Policy for retrying transient store failures.
    pub const fn transient() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            max_attempts: 5,
        }
    }

    /// Policy for polling a table's status.
    pub const fn table_poll() -> Self {
        Self {
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(5),
            max_attempts: 60,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Delay to wait after the given 0-based attempt.
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Bounded wait: a backoff schedule plus a ceiling on total time spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub backoff: Backoff,
    pub max_wait: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            backoff: Backoff::table_poll(),
            max_wait: Duration::from_secs(300),
        }
    }
}

impl WaitPolicy {
    /// Whether sleeping `delay` after `elapsed` would overrun the ceiling.
    pub fn exceeds(&self, elapsed: Duration, delay: Duration) -> bool {
        elapsed.saturating_add(delay) > self.max_wait
    }
}
