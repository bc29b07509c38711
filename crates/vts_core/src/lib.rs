//! VTS Core - Backend logic for video/telemetry synchronization
//!
//! This crate contains the sync core with zero UI dependencies:
//! - Container metadata parsing (creation time from `moov`/`mvhd`)
//! - Timeline alignment between a video and a telemetry session
//! - A sync controller that keeps a plot cursor and video playback in step
//!
//! It can be embedded in a dashboard or driven from a CLI tool.

pub mod config;
pub mod container;
pub mod logging;
pub mod models;
pub mod sync;
pub mod timeline;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
