//! Offset and overlap computation.

use serde::{Deserialize, Serialize};

use crate::models::SessionTimeline;

/// Result of aligning a video against a session.
///
/// Session-relative time `t` and video-relative time `v` are related by
/// `v = t + time_offset_seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    /// Session start minus video creation time, in seconds.
    pub time_offset_seconds: f64,
    /// Whether the video interval intersects the session interval.
    pub overlaps: bool,
    /// Video start in epoch seconds.
    pub media_start_epoch_seconds: i64,
    /// Video end in epoch seconds.
    pub media_end_epoch_seconds: f64,
}

impl Alignment {
    /// Convert session-relative seconds to video-relative seconds.
    pub fn video_time(&self, session_seconds: f64) -> f64 {
        session_seconds + self.time_offset_seconds
    }

    /// Convert video-relative seconds to session-relative seconds.
    pub fn telemetry_time(&self, video_seconds: f64) -> f64 {
        video_seconds - self.time_offset_seconds
    }

    /// Video position of the session start, clamped into the media.
    ///
    /// When the video starts after the session, this is `0.0`.
    pub fn initial_video_position(&self, media_duration_seconds: f64) -> f64 {
        self.time_offset_seconds
            .max(0.0)
            .min(media_duration_seconds.max(0.0))
    }
}

/// Align a video against a telemetry session.
///
/// Overlap uses strict inequalities on both sides: a video ending exactly
/// at session start, or starting exactly at session end, does not overlap.
/// The offset is returned either way.
pub fn align(
    creation_time_epoch_seconds: i64,
    media_duration_seconds: f64,
    session: &SessionTimeline,
) -> Alignment {
    let media_start = creation_time_epoch_seconds as f64;
    let media_end = media_start + media_duration_seconds;

    let overlaps = (session.start_epoch_seconds as f64) < media_end
        && creation_time_epoch_seconds < session.end_epoch_seconds;
    let time_offset_seconds = (session.start_epoch_seconds - creation_time_epoch_seconds) as f64;

    tracing::debug!(
        "Aligned video [{}, {}] to session [{}, {}]: offset {}s, overlaps {}",
        media_start,
        media_end,
        session.start_epoch_seconds,
        session.end_epoch_seconds,
        time_offset_seconds,
        overlaps
    );

    Alignment {
        time_offset_seconds,
        overlaps,
        media_start_epoch_seconds: creation_time_epoch_seconds,
        media_end_epoch_seconds: media_end,
    }
}
