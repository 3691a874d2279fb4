// src/logging.rs
// =============================================================================
// Logging setup shared by both binaries.
//
// Structured tracing events go to stderr, filtered by RUST_LOG (default:
// info). stdout is left to the reports, so `spider --json` stays parseable.
// =============================================================================

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
