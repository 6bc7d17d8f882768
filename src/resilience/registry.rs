//! Breaker registry (C4, §4.4): maps processor name to its breaker.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use super::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, StatusReport};

/// Error returned when an admin operation names an unknown processor.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown processor: {0}")]
pub struct UnknownProcessor(pub String);

/// Owns one breaker per configured processor, seeded once at construction.
pub struct BreakerRegistry {
    breakers: HashMap<String, Arc<CircuitBreaker>>,
}

impl BreakerRegistry {
    /// Seeds one breaker per name in `processor_names`, all sharing `config`.
    #[must_use]
    pub fn new(processor_names: &[&str], config: CircuitBreakerConfig) -> Self {
        let breakers = processor_names
            .iter()
            .map(|name| ((*name).to_string(), Arc::new(CircuitBreaker::new(*name, config))))
            .collect();
        Self { breakers }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<CircuitBreaker>> {
        self.breakers.get(name).cloned()
    }

    #[must_use]
    pub fn list(&self, now: Instant) -> Vec<StatusReport> {
        self.breakers.values().map(|b| b.status(now)).collect()
    }

    /// # Errors
    /// Returns `UnknownProcessor` if `name` is not a registered processor.
    pub fn reset(&self, name: &str) -> Result<(), UnknownProcessor> {
        self.get(name)
            .ok_or_else(|| UnknownProcessor(name.to_string()))?
            .reset();
        Ok(())
    }

    /// # Errors
    /// Returns `UnknownProcessor` if `name` is not a registered processor.
    pub fn inject(&self, name: &str, k: u32, now: Instant) -> Result<StatusReport, UnknownProcessor> {
        let breaker = self
            .get(name)
            .ok_or_else(|| UnknownProcessor(name.to_string()))?;
        breaker.inject_failures(k, now);
        Ok(breaker.status(now))
    }
}
