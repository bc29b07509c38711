//! Sync controller: load sequencing and live cursor/playback propagation.

use parking_lot::Mutex;

use super::bindings::{BindingTable, PlotBinding, PlotEvent, PlotHandler, DEFAULT_PLOT_BINDINGS};
use super::error::{SyncError, SyncResult};
use super::hosts::SyncHosts;
use super::state::SyncState;
use crate::config::SyncSettings;
use crate::container;
use crate::models::{MediaAsset, OverlapPolicy, SyncPhase};
use crate::timeline::{self, Alignment};

/// Events emitted by the media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    /// The user started scrubbing.
    SeekingStart,
    /// The scrub finished at the element's current time.
    SeekingEnd,
    /// Playback position changed.
    TimeProgressed,
}

/// How a load attempt ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadOutcome {
    /// The video overlaps the session and sync is live.
    Ready(Alignment),
    /// Sync is live although the video misses the session (warn policy).
    ReadyWithoutOverlap(Alignment),
    /// A newer load or a detach made this attempt stale; nothing was applied.
    Superseded,
}

/// Keeps one session view's plot cursor and video playback in step.
///
/// All state lives behind one mutex that is never held across an await
/// point or a collaborator call. Event handlers do nothing unless the
/// controller is in the ready phase.
pub struct SyncController {
    hosts: SyncHosts,
    settings: SyncSettings,
    bindings: BindingTable,
    state: Mutex<SyncState>,
}

impl SyncController {
    /// Create a controller wired to the default plot bindings.
    pub fn new(hosts: SyncHosts, settings: SyncSettings) -> Self {
        Self::with_bindings(hosts, settings, DEFAULT_PLOT_BINDINGS)
    }

    /// Create a controller with an explicit plot binding table.
    pub fn with_bindings(hosts: SyncHosts, settings: SyncSettings, bindings: &[PlotBinding]) -> Self {
        let bindings = BindingTable::resolve(bindings, hosts.plot.as_ref());
        tracing::debug!("Sync controller attached with {} plot binding(s)", bindings.len());
        Self {
            hosts,
            settings,
            bindings,
            state: Mutex::new(SyncState::default()),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SyncState {
        self.state.lock().clone()
    }

    /// Current phase.
    pub fn phase(&self) -> SyncPhase {
        self.state.lock().phase
    }

    /// Offset of the loaded asset, if ready.
    pub fn time_offset_seconds(&self) -> Option<f64> {
        self.state.lock().time_offset_seconds
    }

    /// Load a new video and align it against the current session.
    ///
    /// Any load already in flight becomes stale. Failures are reported
    /// through the error reporter, recorded in the state and returned.
    /// A stale attempt returns `LoadOutcome::Superseded` without touching
    /// state or reporting anything.
    pub async fn load_asset(&self, asset: MediaAsset) -> SyncResult<LoadOutcome> {
        let generation = self.state.lock().begin_load(&asset.name);
        tracing::info!(
            "Loading video '{}' ({}), generation {}",
            asset.name,
            asset.mime_type,
            generation
        );

        if !self.hosts.media.can_play_type(&asset.mime_type) {
            return self.fail(generation, SyncError::unsupported_media_type(&asset.mime_type));
        }
        self.hosts.media.load(&asset);

        let parsed = container::read_source_metadata(&asset.source).await;
        if !self.is_current(generation) {
            return Ok(self.superseded(generation, "metadata parse"));
        }
        let metadata = match parsed {
            Ok(metadata) => metadata,
            Err(e) => return self.fail(generation, e.into()),
        };
        if let Some(created) = metadata.created_at() {
            tracing::debug!("Video '{}' created at {}", asset.name, created.to_rfc3339());
        }

        let duration = self.wait_for_duration().await;
        if !self.is_current(generation) {
            return Ok(self.superseded(generation, "duration wait"));
        }
        let duration = match duration {
            Ok(duration) => duration,
            Err(e) => return self.fail(generation, e),
        };

        let session = self.hosts.timeline.session_timeline();
        let alignment = timeline::align(metadata.creation_time_epoch_seconds, duration, &session);

        let warning = if alignment.overlaps {
            None
        } else {
            let err = SyncError::no_overlap(&alignment, session);
            match self.settings.overlap_policy {
                OverlapPolicy::Reject => return self.fail(generation, err),
                OverlapPolicy::Warn => Some(err),
            }
        };

        if !self.enter_ready(generation, &alignment, duration, warning.as_ref()) {
            return Ok(self.superseded(generation, "ready transition"));
        }

        Ok(if alignment.overlaps {
            LoadOutcome::Ready(alignment)
        } else {
            LoadOutcome::ReadyWithoutOverlap(alignment)
        })
    }

    /// Handle an event from the media element.
    pub fn handle_media_event(&self, event: MediaEvent) {
        match event {
            MediaEvent::SeekingStart => {
                let mut state = self.state.lock();
                if state.phase == SyncPhase::Ready {
                    state.seeking = true;
                    tracing::trace!("Scrub started");
                }
            }
            MediaEvent::SeekingEnd => {
                {
                    let mut state = self.state.lock();
                    if state.phase != SyncPhase::Ready {
                        return;
                    }
                    state.seeking = false;
                }
                tracing::trace!("Scrub finished");
                self.push_cursor();
            }
            MediaEvent::TimeProgressed => {
                self.push_cursor();
            }
        }
    }

    /// Seek the video to a session-relative time requested by the plot.
    ///
    /// Honored only while ready, paused and not scrubbing; otherwise the
    /// request is dropped. Returns whether the video was moved.
    pub fn request_seek(&self, session_relative_seconds: f64) -> bool {
        let Some(offset) = self.state.lock().live_offset() else {
            tracing::trace!("Seek to {}s ignored: not live", session_relative_seconds);
            return false;
        };
        if !self.hosts.media.paused() {
            tracing::trace!("Seek to {}s ignored: playing", session_relative_seconds);
            return false;
        }

        let target = session_relative_seconds + offset;
        tracing::debug!("Seeking video to {}s (session {}s)", target, session_relative_seconds);
        self.hosts.media.set_current_time(target);
        true
    }

    /// Dispatch an event from a plot element through the binding table.
    ///
    /// Returns whether the event had an effect.
    pub fn handle_plot_event(&self, element_id: &str, event: PlotEvent) -> bool {
        match (self.bindings.handler_for(element_id), event) {
            (Some(PlotHandler::SeekVideo), PlotEvent::SeekRequested(seconds)) => {
                self.request_seek(seconds)
            }
            (None, _) => {
                tracing::trace!("No binding for plot element '{}'", element_id);
                false
            }
        }
    }

    /// Tear down for a closing session view.
    ///
    /// In-flight loads become stale and every handler goes inert.
    pub fn detach(&self) {
        let mut state = self.state.lock();
        state.reset();
        tracing::debug!("Sync controller detached (generation {})", state.generation);
    }

    /// Push the cursor for the media's current position, if live.
    fn push_cursor(&self) -> Option<f64> {
        let offset = self.state.lock().live_offset()?;
        let cursor = self.hosts.media.current_time() - offset;
        self.hosts.plot.set_cursor(cursor);
        Some(cursor)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state.lock().generation == generation
    }

    fn superseded(&self, generation: u64, stage: &str) -> LoadOutcome {
        tracing::debug!("Load generation {} superseded after {}", generation, stage);
        LoadOutcome::Superseded
    }

    /// Wait for the media host to know the duration, bounded by the timeout.
    async fn wait_for_duration(&self) -> SyncResult<f64> {
        let duration = match self.hosts.media.duration() {
            Some(duration) => duration,
            None => {
                let timeout = self.settings.metadata_timeout();
                tokio::time::timeout(timeout, self.hosts.media.metadata_loaded())
                    .await
                    .map_err(|_| {
                        SyncError::malformed(format!(
                            "media duration unavailable after {} ms",
                            timeout.as_millis()
                        ))
                    })?
            }
        };

        if !duration.is_finite() || duration < 0.0 {
            return Err(SyncError::malformed(format!("invalid media duration {duration}")));
        }
        Ok(duration)
    }

    /// Record a failure for a current load, unload the media and report it.
    fn fail(&self, generation: u64, err: SyncError) -> SyncResult<LoadOutcome> {
        {
            let mut state = self.state.lock();
            if state.generation != generation {
                drop(state);
                return Ok(self.superseded(generation, "failure"));
            }
            state.phase = SyncPhase::Error;
            state.time_offset_seconds = None;
            state.last_error = Some(err.clone());
        }

        tracing::warn!("Video load failed: {}", err);
        self.hosts.media.unload();
        self.hosts.reporter.report(&err.to_string());
        Err(err)
    }

    /// Commit a successful alignment. Returns false if the load went stale.
    ///
    /// A `warning` is reported only once the transition is committed.
    fn enter_ready(
        &self,
        generation: u64,
        alignment: &Alignment,
        duration: f64,
        warning: Option<&SyncError>,
    ) -> bool {
        {
            let mut state = self.state.lock();
            if state.generation != generation {
                return false;
            }
            state.phase = SyncPhase::Ready;
            state.time_offset_seconds = Some(alignment.time_offset_seconds);
            state.seeking = false;
        }

        if let Some(warning) = warning {
            tracing::warn!("{}; loading anyway", warning);
            self.hosts.reporter.report(&warning.to_string());
        }

        tracing::info!(
            "Video synced: offset {}s, duration {}s",
            alignment.time_offset_seconds,
            duration
        );

        if self.settings.seek_to_session_start {
            let position = alignment.initial_video_position(duration);
            self.hosts.media.set_current_time(position);
            self.hosts.plot.set_cursor(alignment.telemetry_time(position));
        }
        true
    }
}
