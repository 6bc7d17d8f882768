//! Domain layer: value objects and the processor contract.
//!
//! This layer has no knowledge of HTTP, configuration loading, or the
//! concrete processor implementations — only the vocabulary the rest of the
//! engine is built from.

pub mod money;
pub mod processor;
pub mod transaction;

pub use money::Money;
pub use processor::Processor;
pub use transaction::{Currency, Outcome, OutcomeKind, TransactionRequest};
