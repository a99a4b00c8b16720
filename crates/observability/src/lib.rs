//! Tracing and logging (shared setup).

/// Subscriber configuration (filters, formatting).
pub mod subscriber;

pub use subscriber::{init, init_for_tests, DEFAULT_FILTER};
