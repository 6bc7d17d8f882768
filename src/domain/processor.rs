//! The processor contract (C1, §4.1).
//!
//! A capability contract, not an inheritance tree: any type implementing
//! this trait can be ranked and tried by the fallback engine. Mock
//! processors (see `crate::processors`) differ only in name, fee rate, and
//! outcome-sampling table.

use async_trait::async_trait;

use super::transaction::{Outcome, TransactionRequest};

/// A downstream service capable of attempting to authorize a charge.
///
/// Implementations MUST NOT panic under normal operation. The engine treats
/// a panic from `charge` the same way it treats any other unhandled
/// failure at this boundary: as `SoftDecline { reason: "internal_error" }`.
#[async_trait]
pub trait Processor: Send + Sync {
    /// Stable identifier, unique across the registry.
    fn name(&self) -> &str;

    /// Non-negative fee rate used for cost-ordered ranking.
    fn fee_rate(&self) -> f64;

    /// Attempts the charge. May suspend for an arbitrary amount of time;
    /// the engine imposes the per-call timeout externally.
    async fn charge(&self, request: &TransactionRequest) -> Outcome;
}
