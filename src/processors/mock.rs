//! Mock downstream processors.
//!
//! `spec.md` §1 treats the processors themselves as external collaborators
//! — only the `Processor` contract in §4.1 matters to the core. These two
//! implementations are the bundled reference processors this repo ships so
//! the HTTP surface and the end-to-end scenarios (§8) have something to run
//! against. Per §9, outcome sampling must be seedable for deterministic
//! tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::domain::{Outcome, Processor, TransactionRequest};

/// A processor that replays a fixed, scripted sequence of outcomes — one
/// per call — repeating the last scripted outcome once exhausted. Used to
/// drive the exact end-to-end scenarios in §8.
pub struct ScriptedProcessor {
    name: String,
    fee_rate: f64,
    script: Mutex<VecDeque<Outcome>>,
}

impl ScriptedProcessor {
    #[must_use]
    pub fn new(name: impl Into<String>, fee_rate: f64, outcomes: Vec<Outcome>) -> Self {
        Self {
            name: name.into(),
            fee_rate,
            script: Mutex::new(outcomes.into()),
        }
    }
}

#[async_trait]
impl Processor for ScriptedProcessor {
    fn name(&self) -> &str {
        &self.name
    }

    fn fee_rate(&self) -> f64 {
        self.fee_rate
    }

    async fn charge(&self, _request: &TransactionRequest) -> Outcome {
        let mut script = self
            .script
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        script.pop_front().unwrap_or(Outcome::SoftDecline {
            reason: "script_exhausted".to_string(),
        })
    }
}

/// One entry in a weighted outcome table: a weight and the outcome it
/// produces when sampled.
#[derive(Debug, Clone)]
pub struct WeightedOutcome {
    pub weight: f64,
    pub outcome: Outcome,
}

/// A processor that samples outcomes from a weighted probability table,
/// for the runnable HTTP demo. The draw is seedable (`MOCK_SEED`) so a
/// whole run can be replayed deterministically.
pub struct RandomOutcomeProcessor {
    name: String,
    fee_rate: f64,
    table: Vec<WeightedOutcome>,
    simulated_latency: Duration,
    rng: Mutex<StdRng>,
}

impl RandomOutcomeProcessor {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        fee_rate: f64,
        table: Vec<WeightedOutcome>,
        simulated_latency: Duration,
        seed: u64,
    ) -> Self {
        Self {
            name: name.into(),
            fee_rate,
            table,
            simulated_latency,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn sample(&self) -> Outcome {
        let total_weight: f64 = self.table.iter().map(|w| w.weight).sum();
        let mut rng = self.rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut draw = rng.random_range(0.0..total_weight.max(f64::EPSILON));
        for entry in &self.table {
            if draw < entry.weight {
                return entry.outcome.clone();
            }
            draw -= entry.weight;
        }
        self.table
            .last()
            .map_or(Outcome::Success, |entry| entry.outcome.clone())
    }
}

#[async_trait]
impl Processor for RandomOutcomeProcessor {
    fn name(&self) -> &str {
        &self.name
    }

    fn fee_rate(&self) -> f64 {
        self.fee_rate
    }

    async fn charge(&self, _request: &TransactionRequest) -> Outcome {
        if !self.simulated_latency.is_zero() {
            tokio::time::sleep(self.simulated_latency).await;
        }
        self.sample()
    }
}
