//! Structured logging setup (§10).

use tracing_subscriber::EnvFilter;

/// Initializes the global `tracing` subscriber from `RUST_LOG`, defaulting
/// this crate and `tower_http` to `info`.
#[allow(clippy::missing_panics_doc)]
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("fallback_engine=info".parse().expect("valid directive"))
                .add_directive("tower_http=info".parse().expect("valid directive")),
        )
        .init();
}
