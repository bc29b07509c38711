//! Timeline alignment between a video and a telemetry session.
//!
//! Pure computation: given a video's creation time and duration and the
//! session's absolute interval, compute the constant clock offset and
//! whether the two intervals overlap.

mod aligner;

pub use aligner::{align, Alignment};
