//! The HTTP-facing response schema for `POST /transactions` (§6).

use chrono::{DateTime, Utc};
use serde::Serialize;

/// `"hard"` or `"soft"` — present only when `status == "declined"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclineType {
    Hard,
    Soft,
}

/// The exact response body §6 specifies.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionResponse {
    pub transaction_id: String,
    pub status: &'static str,
    pub processor_used: Option<String>,
    pub amount: String,
    pub currency: String,
    pub fee: Option<String>,
    pub fee_rate: Option<f64>,
    pub decline_reason: Option<String>,
    pub decline_type: Option<DeclineType>,
    pub attempts: u32,
    pub processors_tried: Vec<String>,
    pub latency_ms: f64,
    pub processed_at: DateTime<Utc>,
}
