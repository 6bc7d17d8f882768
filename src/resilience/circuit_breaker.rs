//! Circuit breaker (C3, §4.3): a three-state machine over one rolling
//! window.
//!
//! State mutations (window append/evict and state transitions) are
//! serialized behind a single per-breaker mutex so that concurrent
//! `allow`/`record_*` calls from different transactions observe a
//! consistent state machine. The lock is never held across a suspension
//! point — `charge`, the backoff sleep, and the timeout wait all happen
//! outside any call into this module.

use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::window::RollingWindow;
use crate::domain::Outcome;

/// One of the three breaker states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl fmt::Display for BreakerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        };
        write!(f, "{s}")
    }
}

/// Tunables for a single breaker (§6 configuration table, applied
/// uniformly to every processor).
#[derive(Debug, Clone, Copy)]
pub struct CircuitBreakerConfig {
    pub rolling_window_size: u32,
    pub rolling_window_age: Duration,
    pub trip_threshold: f64,
    pub cooldown: Duration,
    pub min_samples: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            rolling_window_size: 50,
            rolling_window_age: Duration::from_secs(300),
            trip_threshold: 0.20,
            cooldown: Duration::from_secs(120),
            min_samples: 5,
        }
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Admitted. `is_probe` is true only for the `HALF_OPEN` recovery call.
    Pass { is_probe: bool },
    /// Rejected without consulting the processor.
    Reject,
}

impl Decision {
    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Pass { .. })
    }
}

/// A point-in-time rendering of a breaker's health, matching the
/// `GET /processors/status` schema (§6).
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub name: String,
    pub state: BreakerState,
    pub success_rate: f64,
    pub total_calls_in_window: u32,
    pub successful_calls_in_window: u32,
    pub failed_calls_in_window: u32,
    pub last_failure_at: Option<Duration>,
    pub cooldown_remaining_seconds: Option<f64>,
}

struct Inner {
    state: BreakerState,
    window: RollingWindow,
    opened_at: Option<Instant>,
    last_failure: Option<Instant>,
}

/// The per-processor breaker itself.
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    #[must_use]
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            inner: Mutex::new(Inner {
                state: BreakerState::Closed,
                window: RollingWindow::new(config.rolling_window_size, config.rolling_window_age),
                opened_at: None,
                last_failure: None,
            }),
            config,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Admission check (§4.3 admission table). May transition `OPEN` to
    /// `HALF_OPEN` when the cooldown has elapsed.
    #[allow(clippy::missing_panics_doc)]
    pub fn allow(&self, now: Instant) -> Decision {
        let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        match inner.state {
            BreakerState::Closed => Decision::Pass { is_probe: false },
            BreakerState::Open => {
                let opened_at = inner.opened_at.unwrap_or(now);
                if now.saturating_duration_since(opened_at) >= self.config.cooldown {
                    inner.state = BreakerState::HalfOpen;
                    tracing::info!(processor = %self.name, "circuit breaker entering half-open probe");
                    Decision::Pass { is_probe: true }
                } else {
                    Decision::Reject
                }
            }
            // All concurrent HALF_OPEN calls are admitted as probes (§9 open
            // question, resolved to the simpler of the two defensible options).
            BreakerState::HalfOpen => Decision::Pass { is_probe: true },
        }
    }

    /// Records a successful charge.
    #[allow(clippy::missing_panics_doc)]
    pub fn record_success(&self, now: Instant) {
        let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.window.record(true, now);
        match inner.state {
            BreakerState::HalfOpen => {
                inner.window.reset();
                inner.state = BreakerState::Closed;
                inner.opened_at = None;
                tracing::info!(processor = %self.name, "circuit breaker closed after successful probe");
                crate::observability::record_breaker_transition(&self.name, "closed");
            }
            BreakerState::Closed | BreakerState::Open => {
                self.evaluate_trip(&mut inner, now);
            }
        }
    }

    /// Records a non-success outcome. Callers MUST NOT call this for
    /// `HardDecline` — per §4.3 that outcome never touches the window.
    #[allow(clippy::missing_panics_doc)]
    pub fn record_failure(&self, now: Instant, outcome: &Outcome) {
        debug_assert!(
            outcome.affects_health(),
            "hard declines must never be recorded to a breaker"
        );
        let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.window.record(false, now);
        inner.last_failure = Some(now);
        match inner.state {
            BreakerState::HalfOpen => {
                inner.state = BreakerState::Open;
                inner.opened_at = Some(now);
                tracing::warn!(processor = %self.name, "circuit breaker re-opened after failed probe");
                crate::observability::record_breaker_transition(&self.name, "open");
            }
            BreakerState::Closed | BreakerState::Open => {
                self.evaluate_trip(&mut inner, now);
            }
        }
    }

    /// Trip evaluation, performed after every `record_*` call while the
    /// breaker is `CLOSED` (a no-op while already `OPEN`).
    fn evaluate_trip(&self, inner: &mut Inner, now: Instant) {
        if inner.state != BreakerState::Closed {
            return;
        }
        let snap = inner.window.snapshot(now);
        if snap.total >= self.config.min_samples && snap.success_rate() < self.config.trip_threshold
        {
            inner.state = BreakerState::Open;
            inner.opened_at = Some(now);
            tracing::warn!(
                processor = %self.name,
                success_rate = snap.success_rate(),
                total = snap.total,
                "circuit breaker tripped open"
            );
            crate::observability::record_breaker_transition(&self.name, "open");
        }
    }

    /// A point-in-time status report.
    #[allow(clippy::missing_panics_doc)]
    pub fn status(&self, now: Instant) -> StatusReport {
        let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let snap = inner.window.snapshot(now);
        let cooldown_remaining = match (inner.state, inner.opened_at) {
            (BreakerState::Closed, _) | (_, None) => None,
            (_, Some(opened_at)) => {
                let elapsed = now.saturating_duration_since(opened_at);
                Some((self.config.cooldown.saturating_sub(elapsed)).as_secs_f64())
            }
        };
        StatusReport {
            name: self.name.clone(),
            state: inner.state,
            success_rate: snap.success_rate(),
            total_calls_in_window: snap.total,
            successful_calls_in_window: snap.successes,
            failed_calls_in_window: snap.failures(),
            last_failure_at: inner.last_failure.map(|t| now.saturating_duration_since(t)),
            cooldown_remaining_seconds: cooldown_remaining,
        }
    }

    /// Admin reset: back to `CLOSED` with an empty window.
    #[allow(clippy::missing_panics_doc)]
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.window.reset();
        inner.state = BreakerState::Closed;
        inner.opened_at = None;
        inner.last_failure = None;
    }

    /// Admin-only: injects `k` failure samples and re-evaluates the trip
    /// condition immediately.
    #[allow(clippy::missing_panics_doc)]
    pub fn inject_failures(&self, k: u32, now: Instant) {
        let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.window.inject_failures(k, now);
        inner.last_failure = Some(now);
        self.evaluate_trip(&mut inner, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::Outcome;

    fn config() -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            rolling_window_size: 50,
            rolling_window_age: Duration::from_secs(300),
            trip_threshold: 0.20,
            cooldown: Duration::from_secs(120),
            min_samples: 5,
        }
    }

    #[test]
    fn closed_admits_and_opened_at_is_nil() {
        let cb = CircuitBreaker::new("test", config());
        let now = Instant::now();
        assert_eq!(cb.allow(now), Decision::Pass { is_probe: false });
        assert!(cb.status(now).cooldown_remaining_seconds.is_none());
    }

    #[test]
    fn trips_open_once_min_samples_and_threshold_crossed() {
        let cb = CircuitBreaker::new("test", config());
        let now = Instant::now();
        cb.inject_failures(6, now);
        assert_eq!(cb.allow(now), Decision::Reject);
        assert_eq!(cb.status(now).state, BreakerState::Open);
    }

    #[test]
    fn never_trips_below_minimum_samples() {
        let cb = CircuitBreaker::new("test", config());
        let now = Instant::now();
        for _ in 0..4 {
            cb.record_failure(now, &Outcome::SoftDecline { reason: "x".into() });
        }
        assert_eq!(cb.status(now).state, BreakerState::Closed);
    }

    #[test]
    fn half_open_after_cooldown_and_closes_on_success() {
        let cb = CircuitBreaker::new("test", config());
        let t0 = Instant::now();
        cb.inject_failures(6, t0);
        let t1 = t0 + Duration::from_secs(121);
        assert_eq!(cb.allow(t1), Decision::Pass { is_probe: true });
        cb.record_success(t1);
        let status = cb.status(t1);
        assert_eq!(status.state, BreakerState::Closed);
        assert_eq!(status.total_calls_in_window, 0);
    }

    #[test]
    fn half_open_reopens_on_failure() {
        let cb = CircuitBreaker::new("test", config());
        let t0 = Instant::now();
        cb.inject_failures(6, t0);
        let t1 = t0 + Duration::from_secs(121);
        let _ = cb.allow(t1);
        cb.record_failure(t1, &Outcome::Timeout { reason: "timeout".into() });
        assert_eq!(cb.status(t1).state, BreakerState::Open);
    }

    #[test]
    fn reset_restores_closed_empty() {
        let cb = CircuitBreaker::new("test", config());
        let now = Instant::now();
        cb.inject_failures(6, now);
        cb.reset();
        let status = cb.status(now);
        assert_eq!(status.state, BreakerState::Closed);
        assert_eq!(status.total_calls_in_window, 0);
    }
}
