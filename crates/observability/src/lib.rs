//! Tracing/logging setup shared by every binary.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(DEFAULT_FILTER);
}

/// Filter used when `RUST_LOG` is unset: our crates at `info`, sqlx statement
/// logging only when slow or failing.
pub const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Tracing configuration (filters, layers).
pub mod tracing;
