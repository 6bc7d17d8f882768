//! Environment-driven configuration (§6, §12).
//!
//! Every key is optional; an unparseable value logs a warning and falls
//! back to that key's default rather than failing startup — configuration
//! must never be the reason the process refuses to start.

use std::time::Duration;

use crate::resilience::{BackoffConfig, CircuitBreakerConfig};

/// The fully resolved engine configuration.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub circuit_breaker: CircuitBreakerConfig,
    pub backoff: BackoffConfig,
    pub processor_timeout: Duration,
    pub http_port: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            circuit_breaker: CircuitBreakerConfig::default(),
            backoff: BackoffConfig::default(),
            processor_timeout: Duration::from_secs_f64(3.0),
            http_port: default_http_port(),
        }
    }
}

impl EngineConfig {
    /// Reads every key listed in §6 from the environment, falling back to
    /// its documented default on absence or parse failure.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            circuit_breaker: CircuitBreakerConfig {
                rolling_window_size: env_u32("CB_ROLLING_WINDOW_SIZE", default_rolling_window_size()),
                rolling_window_age: Duration::from_secs(u64::from(env_u32(
                    "CB_ROLLING_WINDOW_SECONDS",
                    default_rolling_window_seconds(),
                ))),
                trip_threshold: env_f64("CB_TRIP_THRESHOLD", default_trip_threshold()),
                cooldown: Duration::from_secs(u64::from(env_u32(
                    "CB_COOLDOWN_SECONDS",
                    default_cooldown_seconds(),
                ))),
                min_samples: env_u32("CB_MIN_SAMPLES", default_min_samples()),
            },
            backoff: BackoffConfig {
                base: Duration::from_secs_f64(env_f64("BACKOFF_BASE_SECONDS", default_backoff_base())),
                cap: Duration::from_secs_f64(env_f64("BACKOFF_MAX_SECONDS", default_backoff_cap())),
                max_retries: env_u32("BACKOFF_MAX_RETRIES", default_max_retries()),
            },
            processor_timeout: Duration::from_secs_f64(env_f64(
                "PROCESSOR_TIMEOUT_SECONDS",
                default_processor_timeout(),
            )),
            http_port: env_u32("HTTP_PORT", u32::from(default_http_port())) as u16,
        }
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key).ok().map_or(default, |raw| {
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, raw, "invalid environment value, using default");
            default
        })
    })
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key).ok().map_or(default, |raw| {
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, raw, "invalid environment value, using default");
            default
        })
    })
}

const fn default_rolling_window_size() -> u32 {
    50
}

const fn default_rolling_window_seconds() -> u32 {
    300
}

const fn default_trip_threshold() -> f64 {
    0.20
}

const fn default_cooldown_seconds() -> u32 {
    120
}

const fn default_min_samples() -> u32 {
    5
}

const fn default_backoff_base() -> f64 {
    0.5
}

const fn default_backoff_cap() -> f64 {
    30.0
}

const fn default_max_retries() -> u32 {
    2
}

const fn default_processor_timeout() -> f64 {
    3.0
}

const fn default_http_port() -> u16 {
    8080
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_table() {
        let config = EngineConfig::default();
        assert_eq!(config.circuit_breaker.rolling_window_size, 50);
        assert_eq!(config.circuit_breaker.rolling_window_age, Duration::from_secs(300));
        assert!((config.circuit_breaker.trip_threshold - 0.20).abs() < f64::EPSILON);
        assert_eq!(config.circuit_breaker.cooldown, Duration::from_secs(120));
        assert_eq!(config.circuit_breaker.min_samples, 5);
        assert_eq!(config.backoff.base, Duration::from_millis(500));
        assert_eq!(config.backoff.cap, Duration::from_secs(30));
        assert_eq!(config.backoff.max_retries, 2);
        assert_eq!(config.processor_timeout, Duration::from_secs_f64(3.0));
    }
}
