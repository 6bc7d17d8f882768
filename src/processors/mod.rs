//! Bundled reference processor implementations.

mod mock;

pub use mock::{RandomOutcomeProcessor, ScriptedProcessor, WeightedOutcome};
