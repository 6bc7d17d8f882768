//! Transaction request and processor outcome types (§3 of the data model).

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currencies accepted by this engine. A closed set by design — no currency
/// conversion is performed anywhere in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "BRL")]
    Brl,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "MXN")]
    Mxn,
}

impl Currency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brl => "BRL",
            Self::Usd => "USD",
            Self::Mxn => "MXN",
        }
    }
}

/// An immutable charge request as received by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub transaction_id: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub merchant_id: String,
    pub card_last_four: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// The classified result of a single `charge` attempt (§3, §4.1).
///
/// A processor must never raise; any unhandled failure at the `charge`
/// boundary is translated into `SoftDecline { reason: "internal_error" }`
/// by the engine, not by the processor itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    SoftDecline { reason: String },
    HardDecline { reason: String },
    RateLimited { reason: String },
    Timeout { reason: String },
}

impl Outcome {
    /// The outcome kind as it appears in stats records and status reports.
    #[must_use]
    pub const fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success => OutcomeKind::Success,
            Self::SoftDecline { .. } => OutcomeKind::SoftDecline,
            Self::HardDecline { .. } => OutcomeKind::HardDecline,
            Self::RateLimited { .. } => OutcomeKind::RateLimited,
            Self::Timeout { .. } => OutcomeKind::Timeout,
        }
    }

    /// Whether this outcome must be recorded into a breaker's rolling
    /// window. Per §4.3, `HARD_DECLINE` is a cardholder-level outcome and
    /// must never count against a processor's health.
    #[must_use]
    pub const fn affects_health(&self) -> bool {
        !matches!(self, Self::HardDecline { .. })
    }

    /// Whether recording this outcome counts as a health "success" sample.
    #[must_use]
    pub const fn is_healthy_sample(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The trail-token fragment inside the parentheses, e.g. `"success"` or
    /// `"soft_decline:insufficient_funds"` (§6 trail token grammar).
    #[must_use]
    pub fn trail_event(&self) -> String {
        match self {
            Self::Success => "success".to_string(),
            Self::SoftDecline { reason } => format!("soft_decline:{reason}"),
            Self::HardDecline { reason } => format!("hard_decline:{reason}"),
            Self::RateLimited { .. } => "rate_limited".to_string(),
            Self::Timeout { .. } => "timeout".to_string(),
        }
    }
}

/// The closed set of outcome kinds, used wherever only the classification
/// (not the reason string) matters — stats records, status reports, tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Success,
    SoftDecline,
    HardDecline,
    RateLimited,
    Timeout,
}

impl OutcomeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::SoftDecline => "soft_decline",
            Self::HardDecline => "hard_decline",
            Self::RateLimited => "rate_limited",
            Self::Timeout => "timeout",
        }
    }
}
