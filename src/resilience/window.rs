//! Rolling window (C2, §4.2): a plain bounded deque of health samples.
//!
//! Not a sliding quantile or EWMA — ordering is by insertion time, which
//! equals event time, and eviction is lazy on every read or write.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// A single recorded health sample.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub timestamp: Instant,
    pub success: bool,
}

/// Counts over the current (post-eviction) contents of a window.
#[derive(Debug, Clone, Copy, Default)]
pub struct Snapshot {
    pub total: u32,
    pub successes: u32,
}

impl Snapshot {
    /// `successes / total`, treated as `1.0` when `total == 0` (§4.3).
    #[must_use]
    pub fn success_rate(self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            f64::from(self.successes) / f64::from(self.total)
        }
    }

    #[must_use]
    pub const fn failures(self) -> u32 {
        self.total - self.successes
    }
}

/// A time- and size-bounded sequence of samples.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    max_size: u32,
    max_age: Duration,
    samples: VecDeque<Sample>,
}

impl RollingWindow {
    #[must_use]
    pub fn new(max_size: u32, max_age: Duration) -> Self {
        Self {
            max_size,
            max_age,
            samples: VecDeque::new(),
        }
    }

    /// Appends a sample and evicts from the head while `len > W` or the
    /// oldest sample is older than `A` relative to `at`.
    pub fn record(&mut self, success: bool, at: Instant) {
        self.samples.push_back(Sample {
            timestamp: at,
            success,
        });
        self.evict(at);
    }

    /// Lazily evicts, then returns the total/successes counts.
    pub fn snapshot(&mut self, at: Instant) -> Snapshot {
        self.evict(at);
        let total = self.samples.len() as u32;
        let successes = self.samples.iter().filter(|s| s.success).count() as u32;
        Snapshot { total, successes }
    }

    /// Empties the window.
    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Admin-only: appends `k` failure samples at `at`.
    pub fn inject_failures(&mut self, k: u32, at: Instant) {
        for _ in 0..k {
            self.samples.push_back(Sample {
                timestamp: at,
                success: false,
            });
        }
        self.evict(at);
    }

    fn evict(&mut self, at: Instant) {
        while self.samples.len() as u32 > self.max_size {
            self.samples.pop_front();
        }
        while let Some(front) = self.samples.front() {
            if at.saturating_duration_since(front.timestamp) > self.max_age {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_by_size() {
        let mut w = RollingWindow::new(3, Duration::from_secs(300));
        let now = Instant::now();
        for _ in 0..5 {
            w.record(true, now);
        }
        assert_eq!(w.snapshot(now).total, 3);
    }

    #[test]
    fn bounds_by_age() {
        let mut w = RollingWindow::new(50, Duration::from_secs(10));
        let t0 = Instant::now();
        w.record(true, t0);
        let later = t0 + Duration::from_secs(11);
        w.record(true, later);
        assert_eq!(w.snapshot(later).total, 1);
    }

    #[test]
    fn inject_failures_counts_as_failures() {
        let mut w = RollingWindow::new(50, Duration::from_secs(300));
        let now = Instant::now();
        w.inject_failures(6, now);
        let snap = w.snapshot(now);
        assert_eq!(snap.total, 6);
        assert_eq!(snap.successes, 0);
    }

    #[test]
    fn success_rate_is_one_when_empty() {
        let mut w = RollingWindow::new(50, Duration::from_secs(300));
        assert!((w.snapshot(Instant::now()).success_rate() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reset_empties_window() {
        let mut w = RollingWindow::new(50, Duration::from_secs(300));
        let now = Instant::now();
        w.record(false, now);
        w.reset();
        assert_eq!(w.snapshot(now).total, 0);
    }

    proptest::proptest! {
        /// Invariant #1: after any sequence of records, the window never
        /// holds more than `max_size` samples, and (since every sample here
        /// is recorded at or before `now`) none can be older than `max_age`
        /// once evicted at `now`.
        #[test]
        fn bounded_by_size_and_age_for_any_sequence(
            outcomes in proptest::collection::vec(proptest::bool::ANY, 0..200),
            max_size in 1u32..20,
            max_age_ms in 10u64..500,
        ) {
            let max_age = Duration::from_millis(max_age_ms);
            let mut w = RollingWindow::new(max_size, max_age);
            let base = Instant::now();
            for (i, success) in outcomes.iter().enumerate() {
                w.record(*success, base + Duration::from_millis(i as u64));
            }
            let now = base + Duration::from_millis(outcomes.len() as u64);
            let snap = w.snapshot(now);
            proptest::prop_assert!(snap.total <= max_size);
            proptest::prop_assert!(snap.successes <= snap.total);
        }
    }
}
