//! Collaborator interfaces consumed by the sync controller.
//!
//! The controller is the only writer of the media position and the plot
//! cursor while it is attached; hosts only report events and answer queries.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{MediaAsset, SessionTimeline};

/// The video element the user watches and scrubs.
#[async_trait]
pub trait MediaElementHost: Send + Sync {
    /// Start loading an asset for playback.
    fn load(&self, asset: &MediaAsset);

    /// Drop the current asset and leave the element inert.
    fn unload(&self);

    /// Current playback position in video-relative seconds.
    fn current_time(&self) -> f64;

    /// Move the playback position (video-relative seconds).
    fn set_current_time(&self, seconds: f64);

    /// Media duration in seconds, once the host knows it.
    fn duration(&self) -> Option<f64>;

    /// Whether playback is paused.
    fn paused(&self) -> bool;

    /// Whether the element can play the given MIME type.
    fn can_play_type(&self, mime_type: &str) -> bool;

    /// Resolves with the duration once the loaded media's metadata is known.
    async fn metadata_loaded(&self) -> f64;
}

/// The telemetry plot showing the session cursor.
pub trait TelemetryPlotHost: Send + Sync {
    /// Move the cursor (session-relative seconds).
    fn set_cursor(&self, session_relative_seconds: f64);

    /// Whether the plot exposes an element with this identifier.
    fn has_element(&self, _element_id: &str) -> bool {
        true
    }
}

/// Supplies the interval of the session currently on screen.
pub trait SessionTimelineProvider: Send + Sync {
    fn session_timeline(&self) -> SessionTimeline;
}

/// Surfaces user-facing error messages.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, message: &str);
}

/// The collaborators one controller is wired to.
#[derive(Clone)]
pub struct SyncHosts {
    pub media: Arc<dyn MediaElementHost>,
    pub plot: Arc<dyn TelemetryPlotHost>,
    pub timeline: Arc<dyn SessionTimelineProvider>,
    pub reporter: Arc<dyn ErrorReporter>,
}

impl SyncHosts {
    /// Bundle the collaborators for a controller.
    pub fn new(
        media: Arc<dyn MediaElementHost>,
        plot: Arc<dyn TelemetryPlotHost>,
        timeline: Arc<dyn SessionTimelineProvider>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            media,
            plot,
            timeline,
            reporter,
        }
    }
}
