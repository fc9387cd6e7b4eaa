//! Process-wide logging setup shared by maplog binaries.
//!
//! Library crates only emit through `tracing`; installing a subscriber is the
//! binary's job.

/// Initialize tracing/logging using `RUST_LOG` and `MAPLOG_LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::LogFormat;
