//! Observability: structured logging and Prometheus metrics (§10, §14).

mod metrics;
mod tracing_init;

pub use metrics::{MetricsConfig, init_metrics, record_attempt, record_breaker_transition};
pub use tracing_init::init_tracing;
