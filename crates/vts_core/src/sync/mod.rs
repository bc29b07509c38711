//! Video/telemetry playback synchronization.
//!
//! The [`SyncController`] owns the sync state machine for one session view:
//! - `load_asset` parses the video's creation time, waits for the media
//!   host to report a duration and aligns the video against the session
//! - Once ready, media time changes move the plot cursor and plot seek
//!   requests move the video, through the fixed clock offset
//! - A generation counter discards results of superseded loads
//!
//! Collaborators (media element, plot, session provider, error sink) are
//! injected as trait objects through [`SyncHosts`].

mod bindings;
mod controller;
mod error;
mod hosts;
mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use bindings::{BindingTable, PlotBinding, PlotEvent, PlotHandler, DEFAULT_PLOT_BINDINGS};
pub use controller::{LoadOutcome, MediaEvent, SyncController};
pub use error::{SyncError, SyncResult};
pub use hosts::{
    ErrorReporter, MediaElementHost, SessionTimelineProvider, SyncHosts, TelemetryPlotHost,
};
pub use state::SyncState;
