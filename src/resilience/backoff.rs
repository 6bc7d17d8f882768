//! Backoff controller (C5, §4.5): full-jitter delays for rate-limited
//! retries.
//!
//! `delay(attempt) = uniform_random(0, min(cap, base * 2^attempt))`. The
//! draw is seedable so tests can assert exact delays.

use std::time::Duration;

use rand::Rng;

/// Tunables for the backoff controller.
#[derive(Debug, Clone, Copy)]
pub struct BackoffConfig {
    pub base: Duration,
    pub cap: Duration,
    pub max_retries: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(500),
            cap: Duration::from_secs(30),
            max_retries: 2,
        }
    }
}

/// Computes full-jitter retry delays.
#[derive(Debug, Clone, Copy)]
pub struct BackoffController {
    config: BackoffConfig,
}

impl BackoffController {
    #[must_use]
    pub const fn new(config: BackoffConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.config.max_retries
    }

    /// The upper bound for `attempt`, before jitter: `min(cap, base * 2^attempt)`.
    #[must_use]
    pub fn bound(&self, attempt: u32) -> Duration {
        let scaled = self.config.base.saturating_mul(1u32 << attempt.min(31));
        scaled.min(self.config.cap)
    }

    /// Draws a delay uniformly from `[0, bound(attempt)]` using `rng`.
    pub fn delay(&self, attempt: u32, rng: &mut impl Rng) -> Duration {
        let bound = self.bound(attempt);
        if bound.is_zero() {
            return Duration::ZERO;
        }
        let secs = rng.random_range(0.0..=bound.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}
