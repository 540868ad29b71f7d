//! Development-time tracing for debugging the orchestrator.
//!
//! Diagnostics (skipped entries, dropped collections, ignored directives)
//! go to stderr via `tracing`, filtered by `RUST_LOG`. Product output (the
//! catalog listing, the run banner, per-suite status lines) is plain stdout
//! and unaffected by the filter.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`; defaults to `warn` if unset. Output: stderr, compact.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
