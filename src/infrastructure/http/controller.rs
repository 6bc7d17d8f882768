//! HTTP surface (§6, §15). Transport-agnostic by design — the engine
//! itself never imports `axum` — but this is the router this repo ships.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::domain::{Processor, TransactionRequest};
use crate::engine::FallbackEngine;
use crate::error::EngineError;
use crate::resilience::BreakerRegistry;
use crate::stats::InMemoryStatsSink;

use super::dto::{
    InjectFailuresQuery, InjectFailuresResponse, ResetResponse, StatusReportDto,
};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<FallbackEngine>,
    registry: Arc<BreakerRegistry>,
    processors: Arc<HashMap<String, Arc<dyn Processor>>>,
    stats: Arc<InMemoryStatsSink>,
}

impl AppState {
    #[must_use]
    pub fn new(
        engine: Arc<FallbackEngine>,
        registry: Arc<BreakerRegistry>,
        processors: Vec<Arc<dyn Processor>>,
        stats: Arc<InMemoryStatsSink>,
    ) -> Self {
        let processors = processors
            .into_iter()
            .map(|p| (p.name().to_string(), p))
            .collect();
        Self {
            engine,
            registry,
            processors: Arc::new(processors),
            stats,
        }
    }
}

/// Builds the Axum router for all endpoints in §6.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/transactions", post(submit_transaction))
        .route("/processors/status", get(processors_status))
        .route("/processors/{name}/reset", post(reset_processor))
        .route("/processors/{name}/inject-failures", post(inject_failures))
        .route("/stats", get(stats))
        .with_state(state)
}

async fn submit_transaction(
    State(state): State<AppState>,
    Json(request): Json<TransactionRequest>,
) -> impl IntoResponse {
    let response = state.engine.process(&request).await;
    Json(response)
}

async fn processors_status(State(state): State<AppState>) -> impl IntoResponse {
    let now = Instant::now();
    let mut reports: Vec<StatusReportDto> = state
        .registry
        .list(now)
        .into_iter()
        .map(|report| {
            let fee_rate = state
                .processors
                .get(&report.name)
                .map_or(0.0, |p| p.fee_rate());
            StatusReportDto::from_report(report, fee_rate)
        })
        .collect();
    reports.sort_by(|a, b| a.name.cmp(&b.name));
    Json(reports)
}

async fn reset_processor(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ResetResponse>, EngineError> {
    state.registry.reset(&name)?;
    Ok(Json(ResetResponse {
        processor: name,
        action: "reset",
        state: "closed",
    }))
}

async fn inject_failures(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<InjectFailuresQuery>,
) -> Result<Json<InjectFailuresResponse>, EngineError> {
    let now = Instant::now();
    let report = state.registry.inject(&name, query.count, now)?;
    Ok(Json(InjectFailuresResponse {
        processor: name,
        injected_failures: query.count,
        state: report.state.to_string(),
        success_rate: report.success_rate,
        total_calls_in_window: report.total_calls_in_window,
    }))
}

async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.stats.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::domain::{Currency, Outcome};
    use crate::processors::ScriptedProcessor;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn make_state() -> AppState {
        let processors: Vec<Arc<dyn Processor>> = vec![Arc::new(ScriptedProcessor::new(
            "VortexPay",
            0.025,
            vec![Outcome::Success],
        ))];
        let config = EngineConfig::default();
        let registry = Arc::new(BreakerRegistry::new(&["VortexPay"], config.circuit_breaker));
        let stats = Arc::new(InMemoryStatsSink::new());
        let engine = Arc::new(FallbackEngine::with_seed(
            processors.clone(),
            registry.clone(),
            config,
            stats.clone(),
            1,
        ));
        AppState::new(engine, registry, processors, stats)
    }

    #[tokio::test]
    async fn submit_transaction_returns_approved() {
        let app = create_router(make_state());
        let body = serde_json::json!({
            "transaction_id": "t1",
            "amount": "100.00",
            "currency": "BRL",
            "merchant_id": "m1",
            "card_last_four": "1234",
            "metadata": {}
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/transactions")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn reset_unknown_processor_is_404() {
        let app = create_router(make_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/processors/unknown/reset")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn inject_failures_trips_breaker() {
        let app = create_router(make_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/processors/VortexPay/inject-failures?count=6")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
