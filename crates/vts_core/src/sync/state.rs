//! Sync controller state.

use serde::Serialize;

use super::error::SyncError;
use crate::models::SyncPhase;

/// Snapshot of the controller's state machine.
///
/// Owned by the controller; callers only ever see clones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncState {
    /// Current phase.
    pub phase: SyncPhase,
    /// Clock offset of the loaded asset; set once per successful load.
    pub time_offset_seconds: Option<f64>,
    /// Whether the media host is between seek-start and seek-end.
    pub seeking: bool,
    /// Incremented whenever a load begins or the controller detaches.
    pub generation: u64,
    /// Name of the asset being loaded or played.
    pub asset_name: Option<String>,
    /// Failure of the last load attempt.
    #[serde(skip)]
    pub last_error: Option<SyncError>,
}

impl SyncState {
    /// Whether media time changes should currently reach the plot.
    pub fn is_live(&self) -> bool {
        self.phase == SyncPhase::Ready && !self.seeking
    }

    /// Offset to use for live sync, if ready.
    pub fn live_offset(&self) -> Option<f64> {
        if self.is_live() {
            self.time_offset_seconds
        } else {
            None
        }
    }

    /// Reset for a new load and return its generation token.
    pub(crate) fn begin_load(&mut self, asset_name: &str) -> u64 {
        self.generation += 1;
        self.phase = SyncPhase::Loading;
        self.time_offset_seconds = None;
        self.seeking = false;
        self.asset_name = Some(asset_name.to_string());
        self.last_error = None;
        self.generation
    }

    /// Return to idle, invalidating anything in flight.
    pub(crate) fn reset(&mut self) {
        self.generation += 1;
        self.phase = SyncPhase::Idle;
        self.time_offset_seconds = None;
        self.seeking = false;
        self.asset_name = None;
        self.last_error = None;
    }
}
