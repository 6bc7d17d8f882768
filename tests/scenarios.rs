//! End-to-end fallback scenarios (S1-S6), asserting exact status, fee,
//! attempts, and trail values against a real `FallbackEngine`.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Arc;

use fallback_engine::config::EngineConfig;
use fallback_engine::domain::{Currency, Outcome, Processor, TransactionRequest};
use fallback_engine::engine::FallbackEngine;
use fallback_engine::processors::ScriptedProcessor;
use fallback_engine::resilience::BreakerRegistry;
use fallback_engine::stats::InMemoryStatsSink;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_case::test_case;

const PROCESSOR_NAMES: [&str; 3] = ["VortexPay", "SwiftPay", "PixFlow"];

fn request(amount: Decimal) -> TransactionRequest {
    TransactionRequest {
        transaction_id: "txn-1".to_string(),
        amount,
        currency: Currency::Brl,
        merchant_id: "merchant-1".to_string(),
        card_last_four: "4242".to_string(),
        metadata: HashMap::new(),
    }
}

fn engine(processors: Vec<Arc<dyn Processor>>) -> FallbackEngine {
    let config = EngineConfig::default();
    let registry = Arc::new(BreakerRegistry::new(&PROCESSOR_NAMES, config.circuit_breaker));
    let stats = Arc::new(InMemoryStatsSink::new());
    FallbackEngine::with_seed(processors, registry, config, stats, 1)
}

fn scripted(name: &str, fee_rate: f64, outcomes: Vec<Outcome>) -> Arc<dyn Processor> {
    Arc::new(ScriptedProcessor::new(name, fee_rate, outcomes))
}

/// S1, S2, S3, S5, S6 all share the same shape: three scripted processors,
/// one amount, and an expected status/processor/fee/attempts/trail. S4
/// (circuit-open skip) needs a breaker pre-injected into OPEN before the
/// engine is built, so it gets its own test below instead of a case here.
#[test_case(
    vec![Outcome::Success],
    vec![Outcome::Success],
    vec![Outcome::Success],
    dec!(100.00),
    "approved",
    Some("VortexPay"),
    Some("2.5000"),
    None,
    1,
    vec!["VortexPay(success)"]
    ; "s1 first processor succeeds"
)]
#[test_case(
    vec![Outcome::HardDecline { reason: "fraud_detected".to_string() }],
    vec![Outcome::Success],
    vec![Outcome::Success],
    dec!(50.00),
    "declined",
    Some("VortexPay"),
    None,
    Some("fraud_detected"),
    1,
    vec!["VortexPay(hard_decline:fraud_detected)"]
    ; "s2 hard decline stops immediately"
)]
#[test_case(
    vec![Outcome::SoftDecline { reason: "insufficient_funds".to_string() }],
    vec![Outcome::Success],
    vec![Outcome::Success],
    dec!(10.00),
    "approved",
    Some("SwiftPay"),
    Some("0.2900"),
    None,
    2,
    vec!["VortexPay(soft_decline:insufficient_funds)", "SwiftPay(success)"]
    ; "s3 soft decline falls back to next processor"
)]
#[test_case(
    vec![
        Outcome::RateLimited { reason: "rate_limited".to_string() },
        Outcome::RateLimited { reason: "rate_limited".to_string() },
        Outcome::Success,
    ],
    vec![Outcome::Success],
    vec![Outcome::Success],
    dec!(1.00),
    "approved",
    Some("VortexPay"),
    Some("0.0250"),
    None,
    3,
    vec!["VortexPay(rate_limited)", "VortexPay(rate_limited)", "VortexPay(success)"]
    ; "s5 rate limited retries same processor then succeeds"
)]
#[test_case(
    vec![Outcome::SoftDecline { reason: "generic_decline".to_string() }],
    vec![Outcome::SoftDecline { reason: "generic_decline".to_string() }],
    vec![Outcome::SoftDecline { reason: "generic_decline".to_string() }],
    dec!(1.00),
    "declined",
    Some("PixFlow"),
    None,
    Some("generic_decline"),
    3,
    vec![
        "VortexPay(soft_decline:generic_decline)",
        "SwiftPay(soft_decline:generic_decline)",
        "PixFlow(soft_decline:generic_decline)",
    ]
    ; "s6 all processors soft decline"
)]
#[tokio::test]
async fn fallback_scenarios(
    vortex_script: Vec<Outcome>,
    swift_script: Vec<Outcome>,
    pix_script: Vec<Outcome>,
    amount: Decimal,
    expected_status: &str,
    expected_processor: Option<&str>,
    expected_fee: Option<&str>,
    expected_decline_reason: Option<&str>,
    expected_attempts: u32,
    expected_trail: Vec<&str>,
) {
    let engine = engine(vec![
        scripted("VortexPay", 0.025, vortex_script),
        scripted("SwiftPay", 0.029, swift_script),
        scripted("PixFlow", 0.032, pix_script),
    ]);
    let response = engine.process(&request(amount)).await;

    assert_eq!(response.status, expected_status);
    assert_eq!(response.processor_used.as_deref(), expected_processor);
    assert_eq!(response.fee.as_deref(), expected_fee);
    assert_eq!(response.decline_reason.as_deref(), expected_decline_reason);
    assert_eq!(response.attempts, expected_attempts);
    assert_eq!(
        response.processors_tried,
        expected_trail.into_iter().map(str::to_string).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn s4_open_breaker_skips_processor_without_invoking_it() {
    let config = EngineConfig::default();
    let registry = Arc::new(BreakerRegistry::new(&PROCESSOR_NAMES, config.circuit_breaker));
    registry.inject("VortexPay", 6, std::time::Instant::now()).unwrap();

    let vortex: Arc<dyn Processor> = scripted(
        "VortexPay",
        0.025,
        vec![Outcome::Success], // would succeed if invoked; must not be
    );
    let swift: Arc<dyn Processor> = scripted("SwiftPay", 0.029, vec![Outcome::Success]);
    let pix: Arc<dyn Processor> = scripted("PixFlow", 0.032, vec![Outcome::Success]);

    let stats = Arc::new(InMemoryStatsSink::new());
    let engine =
        FallbackEngine::with_seed(vec![vortex, swift, pix], registry, config, stats, 1);
    let response = engine.process(&request(dec!(200.00))).await;

    assert_eq!(response.status, "approved");
    assert_eq!(response.processor_used.as_deref(), Some("SwiftPay"));
    assert_eq!(
        response.processors_tried,
        vec!["VortexPay(circuit_open)".to_string(), "SwiftPay(success)".to_string()]
    );
}
