// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Fallback Engine - payment-processor fallback core
//!
//! Given a charge request, ranks competing downstream processors by fee,
//! invokes them in cost- and health-aware order, and returns a single
//! authoritative outcome together with an audit trail of what was tried
//! and why.
//!
//! # Architecture
//!
//! - **Domain** (`domain`): the `Processor` contract, `TransactionRequest`,
//!   `Outcome`, and the `Money` value object. No knowledge of HTTP,
//!   configuration, or concrete processor implementations.
//! - **Resilience** (`resilience`): the rolling window, per-processor
//!   circuit breaker, breaker registry, and full-jitter backoff controller.
//! - **Engine** (`engine`): `FallbackEngine`, which orchestrates ranking,
//!   per-call timeouts, outcome classification, and retry/skip/stop.
//! - **Processors** (`processors`): bundled mock processor implementations.
//! - **Infrastructure** (`infrastructure`): the Axum HTTP surface.
//! - **Observability** (`observability`): structured logging and
//!   Prometheus metrics.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod infrastructure;
pub mod observability;
pub mod processors;
pub mod resilience;
pub mod stats;

pub use config::EngineConfig;
pub use domain::{Currency, Money, Outcome, OutcomeKind, Processor, TransactionRequest};
pub use engine::{FallbackEngine, TransactionResponse};
pub use error::EngineError;
