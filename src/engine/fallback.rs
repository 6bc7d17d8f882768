//! Fallback engine (C6, §4.6): ranks processors, enforces per-call
//! timeouts, classifies outcomes, and drives the retry/skip/stop policy.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::FutureExt;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::EngineConfig;
use crate::domain::{Outcome, Processor, TransactionRequest};
use crate::resilience::{BackoffController, BreakerRegistry};
use crate::stats::{AttemptObservation, StatsSink};

use super::response::{DeclineType, TransactionResponse};

/// Orchestrates fallback across a fixed, registered set of processors.
pub struct FallbackEngine {
    processors: Vec<Arc<dyn Processor>>,
    registry: Arc<BreakerRegistry>,
    config: EngineConfig,
    backoff: BackoffController,
    stats: Arc<dyn StatsSink>,
    rng: Mutex<StdRng>,
}

impl FallbackEngine {
    /// Builds an engine over `processors`, seeding one breaker per
    /// processor name. The jitter RNG is seeded from OS entropy.
    #[must_use]
    pub fn new(
        processors: Vec<Arc<dyn Processor>>,
        registry: Arc<BreakerRegistry>,
        config: EngineConfig,
        stats: Arc<dyn StatsSink>,
    ) -> Self {
        Self {
            processors,
            registry,
            backoff: BackoffController::new(config.backoff),
            config,
            stats,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Same as `new`, but with a fixed jitter seed — for deterministic
    /// tests (§9 "Randomness").
    #[must_use]
    pub fn with_seed(
        processors: Vec<Arc<dyn Processor>>,
        registry: Arc<BreakerRegistry>,
        config: EngineConfig,
        stats: Arc<dyn StatsSink>,
        seed: u64,
    ) -> Self {
        Self {
            processors,
            registry,
            backoff: BackoffController::new(config.backoff),
            config,
            stats,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Runs the fallback algorithm for one transaction (§4.6).
    #[allow(clippy::too_many_lines)]
    pub async fn process(&self, request: &TransactionRequest) -> TransactionResponse {
        let start = Instant::now();
        let mut attempts: u32 = 0;
        let mut trail: Vec<String> = Vec::new();
        let mut last_attempt: Option<(String, f64, Outcome)> = None;

        let mut candidates = self.processors.clone();
        candidates.sort_by(|a, b| {
            a.fee_rate()
                .partial_cmp(&b.fee_rate())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for processor in &candidates {
            let breaker = self.registry.get(processor.name());
            let Some(breaker) = breaker else {
                // Every processor passed to `new` is seeded into the
                // registry; an absent breaker means misconfiguration, not
                // a business outcome, so skip rather than panic.
                continue;
            };

            if !breaker.allow(Instant::now()).is_pass() {
                tracing::warn!(processor = processor.name(), "circuit open, skipping processor");
                trail.push(format!("{}(circuit_open)", processor.name()));
                continue;
            }

            let mut attempt_index = 0u32;
            loop {
                attempts += 1;
                let attempt_start = Instant::now();
                let outcome = self
                    .invoke_with_timeout(processor.as_ref(), request, self.config.processor_timeout)
                    .await;
                let latency_ms = attempt_start.elapsed().as_secs_f64() * 1000.0;
                let now = Instant::now();

                let fee = matches!(outcome, Outcome::Success).then(|| {
                    crate::domain::Money::new(request.amount)
                        .apply_rate(processor.fee_rate(), 4)
                        .amount()
                });

                tracing::debug!(
                    processor = processor.name(),
                    outcome = outcome.kind().as_str(),
                    latency_ms,
                    "processor attempt completed"
                );

                self.stats.record(AttemptObservation {
                    processor: processor.name().to_string(),
                    outcome_kind: outcome.kind(),
                    amount: request.amount,
                    fee,
                    latency_ms,
                });
                crate::observability::record_attempt(processor.name(), outcome.kind().as_str());

                if outcome.affects_health() {
                    if outcome.is_healthy_sample() {
                        breaker.record_success(now);
                    } else {
                        breaker.record_failure(now, &outcome);
                    }
                }

                trail.push(format!("{}({})", processor.name(), outcome.trail_event()));

                match outcome {
                    Outcome::Success => {
                        let fee_rate = processor.fee_rate();
                        let fee_money = crate::domain::Money::from(fee.unwrap_or_default());
                        return TransactionResponse {
                            transaction_id: request.transaction_id.clone(),
                            status: "approved",
                            processor_used: Some(processor.name().to_string()),
                            amount: request.amount.to_string(),
                            currency: request.currency.as_str().to_string(),
                            fee: Some(fee_money.to_string_min_scale(4)),
                            fee_rate: Some(fee_rate),
                            decline_reason: None,
                            decline_type: None,
                            attempts,
                            processors_tried: trail,
                            latency_ms: start.elapsed().as_secs_f64() * 1000.0,
                            processed_at: Utc::now(),
                        };
                    }
                    Outcome::HardDecline { reason } => {
                        return TransactionResponse {
                            transaction_id: request.transaction_id.clone(),
                            status: "declined",
                            processor_used: Some(processor.name().to_string()),
                            amount: request.amount.to_string(),
                            currency: request.currency.as_str().to_string(),
                            fee: None,
                            fee_rate: None,
                            decline_reason: Some(reason),
                            decline_type: Some(DeclineType::Hard),
                            attempts,
                            processors_tried: trail,
                            latency_ms: start.elapsed().as_secs_f64() * 1000.0,
                            processed_at: Utc::now(),
                        };
                    }
                    Outcome::SoftDecline { reason } => {
                        last_attempt = Some((processor.name().to_string(), latency_ms, Outcome::SoftDecline { reason }));
                        break;
                    }
                    Outcome::Timeout { reason } => {
                        last_attempt = Some((processor.name().to_string(), latency_ms, Outcome::Timeout { reason }));
                        break;
                    }
                    Outcome::RateLimited { reason } => {
                        last_attempt = Some((
                            processor.name().to_string(),
                            latency_ms,
                            Outcome::RateLimited { reason },
                        ));
                        if attempt_index < self.config.backoff.max_retries {
                            let delay = {
                                let mut rng = self
                                    .rng
                                    .lock()
                                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                                self.backoff.delay(attempt_index, &mut *rng)
                            };
                            tokio::time::sleep(delay).await;
                            attempt_index += 1;
                            continue;
                        }
                        break;
                    }
                }
            }
        }

        let (processor_used, reason) = last_attempt
            .map(|(name, _, outcome)| {
                let reason = match outcome {
                    Outcome::SoftDecline { reason }
                    | Outcome::Timeout { reason }
                    | Outcome::RateLimited { reason } => reason,
                    Outcome::Success | Outcome::HardDecline { .. } => unreachable!(
                        "success and hard decline return before reaching exhaustion"
                    ),
                };
                (Some(name), Some(reason))
            })
            .unwrap_or((None, None));

        TransactionResponse {
            transaction_id: request.transaction_id.clone(),
            status: "declined",
            processor_used,
            amount: request.amount.to_string(),
            currency: request.currency.as_str().to_string(),
            fee: None,
            fee_rate: None,
            decline_reason: reason,
            decline_type: Some(DeclineType::Soft),
            attempts,
            processors_tried: trail,
            latency_ms: start.elapsed().as_secs_f64() * 1000.0,
            processed_at: Utc::now(),
        }
    }

    async fn invoke_with_timeout(
        &self,
        processor: &dyn Processor,
        request: &TransactionRequest,
        timeout: Duration,
    ) -> Outcome {
        let charge = AssertUnwindSafe(processor.charge(request)).catch_unwind();
        match tokio::time::timeout(timeout, charge).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_panic)) => {
                tracing::warn!(processor = processor.name(), "processor panicked during charge");
                Outcome::SoftDecline {
                    reason: "internal_error".to_string(),
                }
            }
            Err(_elapsed) => Outcome::Timeout {
                reason: "timeout".to_string(),
            },
        }
    }
}
