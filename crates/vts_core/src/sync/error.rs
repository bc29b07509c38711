//! Error types for the sync controller.
//!
//! Every kind is local to one load attempt and is never retried
//! automatically.

use thiserror::Error;

use crate::container::ContainerError;
use crate::models::SessionTimeline;
use crate::timeline::Alignment;

/// Why a load attempt failed (or, for `NoOverlap` under the warn policy,
/// what was reported).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// The media host cannot play the declared MIME type.
    #[error("Can't play this video type ({mime_type})")]
    UnsupportedMediaType { mime_type: String },

    /// No `moov`/`mvhd` metadata could be located.
    #[error("Video creation time not found")]
    MetadataNotFound,

    /// Truncated or structurally invalid data, or no usable duration.
    #[error("Malformed video: {0}")]
    MalformedContainer(String),

    /// The video interval does not intersect the session interval.
    #[error(
        "Video and session do not overlap (video {media_start}..{media_end}, session {}..{})",
        .session.start_epoch_seconds,
        .session.end_epoch_seconds
    )]
    NoOverlap {
        media_start: i64,
        media_end: f64,
        session: SessionTimeline,
    },
}

impl SyncError {
    /// Create an unsupported media type error.
    pub fn unsupported_media_type(mime_type: impl Into<String>) -> Self {
        Self::UnsupportedMediaType {
            mime_type: mime_type.into(),
        }
    }

    /// Create a malformed container error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedContainer(message.into())
    }

    /// Create a no-overlap error from an alignment result.
    pub fn no_overlap(alignment: &Alignment, session: SessionTimeline) -> Self {
        Self::NoOverlap {
            media_start: alignment.media_start_epoch_seconds,
            media_end: alignment.media_end_epoch_seconds,
            session,
        }
    }
}

impl From<ContainerError> for SyncError {
    fn from(err: ContainerError) -> Self {
        match err {
            ContainerError::MetadataNotFound => Self::MetadataNotFound,
            ContainerError::Malformed { .. } => Self::MalformedContainer(err.to_string()),
            ContainerError::Io(e) => Self::MalformedContainer(format!("read failed: {e}")),
        }
    }
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
