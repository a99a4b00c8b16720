//! Tracing/logging initialization.
//!
//! JSON lines with timestamps on stdout, filtered by `RUST_LOG`. Ledger
//! mutations log at `info`; sqlx statement logging is kept at `warn` unless
//! `RUST_LOG` asks for more.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(default_filter = DEFAULT_FILTER, "tracing initialized");
    }
}

/// Human-readable output captured by the test harness.
///
/// Safe to call from every test (subsequent calls are no-ops).
pub fn init_for_tests() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
