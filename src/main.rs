//! Fallback Engine Binary
//!
//! Starts the HTTP surface described in §6 over a `FallbackEngine` wired
//! with three bundled mock processors (VortexPay, SwiftPay, PixFlow).
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin fallback-engine
//! ```
//!
//! # Environment Variables
//!
//! See `EngineConfig` for the full `CB_*`/`BACKOFF_*`/`PROCESSOR_TIMEOUT_SECONDS`
//! table (§6). Additionally:
//!
//! - `HTTP_PORT`: HTTP server port (default: 8080)
//! - `MOCK_SEED`: seed for the bundled mock processors' outcome sampling
//! - `RUST_LOG`: log level (default: info)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use fallback_engine::config::EngineConfig;
use fallback_engine::domain::Processor;
use fallback_engine::engine::FallbackEngine;
use fallback_engine::infrastructure::http::{AppState, create_router};
use fallback_engine::observability::{init_tracing, MetricsConfig, init_metrics};
use fallback_engine::processors::{RandomOutcomeProcessor, WeightedOutcome};
use fallback_engine::resilience::BreakerRegistry;
use fallback_engine::stats::InMemoryStatsSink;
use fallback_engine::Outcome;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    tracing::info!("Starting payment-processor fallback engine");

    let config = EngineConfig::from_env();
    let seed = std::env::var("MOCK_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let processors: Vec<Arc<dyn Processor>> = vec![
        Arc::new(RandomOutcomeProcessor::new(
            "VortexPay",
            0.025,
            vec![
                WeightedOutcome { weight: 0.9, outcome: Outcome::Success },
                WeightedOutcome {
                    weight: 0.1,
                    outcome: Outcome::SoftDecline { reason: "insufficient_funds".to_string() },
                },
            ],
            Duration::from_millis(40),
            seed,
        )),
        Arc::new(RandomOutcomeProcessor::new(
            "SwiftPay",
            0.029,
            vec![
                WeightedOutcome { weight: 0.92, outcome: Outcome::Success },
                WeightedOutcome {
                    weight: 0.08,
                    outcome: Outcome::SoftDecline { reason: "generic_decline".to_string() },
                },
            ],
            Duration::from_millis(60),
            seed.wrapping_add(1),
        )),
        Arc::new(RandomOutcomeProcessor::new(
            "PixFlow",
            0.032,
            vec![
                WeightedOutcome { weight: 0.95, outcome: Outcome::Success },
                WeightedOutcome {
                    weight: 0.05,
                    outcome: Outcome::SoftDecline { reason: "generic_decline".to_string() },
                },
            ],
            Duration::from_millis(35),
            seed.wrapping_add(2),
        )),
    ];

    let processor_names: Vec<&str> = processors.iter().map(|p| p.name()).collect();
    let registry = Arc::new(BreakerRegistry::new(&processor_names, config.circuit_breaker));
    let stats = Arc::new(InMemoryStatsSink::new());
    let engine = Arc::new(FallbackEngine::with_seed(
        processors.clone(),
        Arc::clone(&registry),
        config,
        stats.clone(),
        seed,
    ));

    if let Err(error) = init_metrics(&MetricsConfig::default()) {
        tracing::warn!(%error, "failed to start prometheus metrics listener");
    }

    let state = AppState::new(engine, registry, processors, stats);
    let app = create_router(state);

    let http_addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    tracing::info!(%http_addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  POST /transactions");
    tracing::info!("  GET  /processors/status");
    tracing::info!("  POST /processors/{{name}}/reset");
    tracing::info!("  POST /processors/{{name}}/inject-failures");
    tracing::info!("  GET  /stats");

    let listener = TcpListener::bind(http_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("fallback engine stopped");
    Ok(())
}

/// Waits for SIGINT or (on unix) SIGTERM.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install ctrl+c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install sigterm handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
