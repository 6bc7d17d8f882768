//! Stats sink (C7): receives one observation per attempt.
//!
//! `spec.md` treats the aggregate statistics accumulator as an external
//! collaborator (§1); this module provides the in-process implementation
//! this repo ships so `GET /stats` has something to serve.

use std::collections::HashMap;
use std::sync::Mutex;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::OutcomeKind;

/// One attempt's worth of observable side effects (§4.6).
#[derive(Debug, Clone)]
pub struct AttemptObservation {
    pub processor: String,
    pub outcome_kind: OutcomeKind,
    pub amount: Decimal,
    pub fee: Option<Decimal>,
    pub latency_ms: f64,
}

/// Receives `AttemptObservation`s. A single mutex is sufficient here — the
/// sink is an append-only counter update, not a suspension point.
pub trait StatsSink: Send + Sync {
    fn record(&self, observation: AttemptObservation);
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct ProcessorCounters {
    pub success: u64,
    pub soft_decline: u64,
    pub hard_decline: u64,
    pub rate_limited: u64,
    pub timeout: u64,
    pub total_fee: Decimal,
}

impl ProcessorCounters {
    fn record(&mut self, observation: &AttemptObservation) {
        match observation.outcome_kind {
            OutcomeKind::Success => self.success += 1,
            OutcomeKind::SoftDecline => self.soft_decline += 1,
            OutcomeKind::HardDecline => self.hard_decline += 1,
            OutcomeKind::RateLimited => self.rate_limited += 1,
            OutcomeKind::Timeout => self.timeout += 1,
        }
        if let Some(fee) = observation.fee {
            self.total_fee += fee;
        }
    }
}

/// Aggregate and per-processor counters since process startup.
#[derive(Debug, Default, Clone, Serialize)]
pub struct StatsSnapshot {
    pub per_processor: HashMap<String, ProcessorCounters>,
    pub total_attempts: u64,
}

/// Process-local, in-memory `StatsSink`.
#[derive(Default)]
pub struct InMemoryStatsSink {
    inner: Mutex<StatsSnapshot>,
}

impl InMemoryStatsSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl StatsSink for InMemoryStatsSink {
    fn record(&self, observation: AttemptObservation) {
        let mut snapshot = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        snapshot.total_attempts += 1;
        snapshot
            .per_processor
            .entry(observation.processor.clone())
            .or_default()
            .record(&observation);
    }
}
