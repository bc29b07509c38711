//! Logging infrastructure for video/telemetry sync.
//!
//! The core logs through `tracing` macros; embedders install a subscriber
//! once at startup with [`init_tracing`].
//!
//! # Example
//!
//! ```no_run
//! use vts_core::logging::{init_tracing, LogLevel};
//!
//! init_tracing(LogLevel::Info);
//! tracing::info!("dashboard view attached");
//! ```

mod types;

pub use types::LogLevel;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize global tracing subscriber for application-wide logging.
///
/// This sets up a subscriber that:
/// - Respects RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr with timestamps
///
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_filter(default_level).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(filter)
        .init();
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

/// Filter used when `RUST_LOG` is unset.
fn default_filter(level: LogLevel) -> LevelFilter {
    LevelFilter::from_level(level.to_tracing_level())
}
