//! Core enums used throughout the crate.

use serde::{Deserialize, Serialize};

/// Phase of the sync controller's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPhase {
    /// No asset selected.
    #[default]
    Idle,
    /// Parse/align in flight.
    Loading,
    /// Offset established, live sync active.
    Ready,
    /// Last load attempt failed.
    Error,
}

impl std::fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncPhase::Idle => write!(f, "idle"),
            SyncPhase::Loading => write!(f, "loading"),
            SyncPhase::Ready => write!(f, "ready"),
            SyncPhase::Error => write!(f, "error"),
        }
    }
}

/// What to do with a video whose interval does not intersect the session.
///
/// The mismatch is reported either way; the policy decides whether the
/// video is still loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Reject the video and enter the error phase.
    #[default]
    Reject,
    /// Report a warning but still enter the ready phase.
    Warn,
}

impl std::fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlapPolicy::Reject => write!(f, "reject"),
            OverlapPolicy::Warn => write!(f, "warn"),
        }
    }
}
