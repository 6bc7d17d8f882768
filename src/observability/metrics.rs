//! Prometheus metrics export (§14). Ambient operational visibility, layered
//! on top of — not a replacement for — the §6 `GET /stats` endpoint.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Where the `/metrics` scrape endpoint listens.
#[derive(Debug, Clone, Copy)]
pub struct MetricsConfig {
    pub listen_addr: SocketAddr,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:9090".parse().expect("valid default address"),
        }
    }
}

/// Installs the Prometheus recorder and starts its HTTP listener.
///
/// # Errors
/// Returns an error if the listener cannot bind `config.listen_addr`.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .install()?;
    tracing::info!(addr = %config.listen_addr, "prometheus metrics listener started");
    Ok(())
}

/// Records one processor attempt outcome.
pub fn record_attempt(processor: &str, outcome_kind: &str) {
    metrics::counter!("fallback_engine_attempts_total", "processor" => processor.to_string(), "outcome" => outcome_kind.to_string()).increment(1);
}

/// Records a circuit breaker state transition.
pub fn record_breaker_transition(processor: &str, state: &str) {
    metrics::gauge!("fallback_engine_breaker_state", "processor" => processor.to_string(), "state" => state.to_string()).set(1.0);
}
