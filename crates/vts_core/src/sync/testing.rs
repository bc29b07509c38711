//! In-memory collaborators for controller tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;

use super::hosts::{
    ErrorReporter, MediaElementHost, SessionTimelineProvider, SyncHosts, TelemetryPlotHost,
};
use crate::container::MAC_EPOCH_OFFSET;
use crate::models::{ByteSource, MediaAsset, SessionTimeline};

pub(crate) const SESSION_START: i64 = 1_700_000_000;
pub(crate) const SESSION_END: i64 = 1_700_000_600;

/// Media element whose duration becomes known when the test says so.
pub(crate) struct MockMedia {
    playable: Vec<&'static str>,
    current_time: Mutex<f64>,
    paused: Mutex<bool>,
    duration: watch::Sender<Option<f64>>,
    pub loads: Mutex<Vec<String>>,
    pub unloads: Mutex<usize>,
    pub seeks: Mutex<Vec<f64>>,
}

impl MockMedia {
    pub fn new() -> Self {
        let (duration, _) = watch::channel(None);
        Self {
            playable: vec!["video/mp4", "video/quicktime"],
            current_time: Mutex::new(0.0),
            paused: Mutex::new(true),
            duration,
            loads: Mutex::new(Vec::new()),
            unloads: Mutex::new(0),
            seeks: Mutex::new(Vec::new()),
        }
    }

    pub fn with_duration(duration: f64) -> Self {
        let media = Self::new();
        media.set_duration(duration);
        media
    }

    pub fn set_duration(&self, duration: f64) {
        self.duration.send_replace(Some(duration));
    }

    /// Simulate the element's own clock moving (playback or scrubbing).
    pub fn advance_to(&self, seconds: f64) {
        *self.current_time.lock() = seconds;
    }

    pub fn set_paused(&self, paused: bool) {
        *self.paused.lock() = paused;
    }
}

#[async_trait]
impl MediaElementHost for MockMedia {
    fn load(&self, asset: &MediaAsset) {
        self.loads.lock().push(asset.name.clone());
    }

    fn unload(&self) {
        *self.unloads.lock() += 1;
    }

    fn current_time(&self) -> f64 {
        *self.current_time.lock()
    }

    fn set_current_time(&self, seconds: f64) {
        self.seeks.lock().push(seconds);
        *self.current_time.lock() = seconds;
    }

    fn duration(&self) -> Option<f64> {
        *self.duration.borrow()
    }

    fn paused(&self) -> bool {
        *self.paused.lock()
    }

    fn can_play_type(&self, mime_type: &str) -> bool {
        self.playable.contains(&mime_type)
    }

    async fn metadata_loaded(&self) -> f64 {
        let mut rx = self.duration.subscribe();
        let known = match rx.wait_for(Option::is_some).await {
            Ok(value) => *value,
            Err(_) => None,
        };
        match known {
            Some(duration) => duration,
            None => std::future::pending().await,
        }
    }
}

/// Plot that records every cursor push.
pub(crate) struct MockPlot {
    elements: Option<Vec<&'static str>>,
    pub cursors: Mutex<Vec<f64>>,
}

impl MockPlot {
    pub fn new() -> Self {
        Self {
            elements: None,
            cursors: Mutex::new(Vec::new()),
        }
    }

    pub fn with_elements(elements: &[&'static str]) -> Self {
        Self {
            elements: Some(elements.to_vec()),
            cursors: Mutex::new(Vec::new()),
        }
    }

    pub fn pushes(&self) -> Vec<f64> {
        self.cursors.lock().clone()
    }

    pub fn clear(&self) {
        self.cursors.lock().clear();
    }
}

impl TelemetryPlotHost for MockPlot {
    fn set_cursor(&self, session_relative_seconds: f64) {
        self.cursors.lock().push(session_relative_seconds);
    }

    fn has_element(&self, element_id: &str) -> bool {
        match &self.elements {
            Some(elements) => elements.contains(&element_id),
            None => true,
        }
    }
}

pub(crate) struct FixedSession(pub SessionTimeline);

impl SessionTimelineProvider for FixedSession {
    fn session_timeline(&self) -> SessionTimeline {
        self.0
    }
}

#[derive(Default)]
pub(crate) struct RecordingReporter {
    pub messages: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// The mocks behind one controller, kept for assertions.
pub(crate) struct Fixture {
    pub media: Arc<MockMedia>,
    pub plot: Arc<MockPlot>,
    pub reporter: Arc<RecordingReporter>,
}

impl Fixture {
    pub fn new(media: MockMedia, plot: MockPlot) -> Self {
        Self {
            media: Arc::new(media),
            plot: Arc::new(plot),
            reporter: Arc::new(RecordingReporter::default()),
        }
    }

    pub fn hosts(&self) -> SyncHosts {
        SyncHosts::new(
            self.media.clone(),
            self.plot.clone(),
            Arc::new(FixedSession(SessionTimeline::new(SESSION_START, SESSION_END))),
            self.reporter.clone(),
        )
    }
}

/// Minimal MP4 with a version-0 movie header.
pub(crate) fn mp4_created_at(creation_epoch_seconds: i64) -> Vec<u8> {
    fn boxed(tag: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut out = ((body.len() + 8) as u32).to_be_bytes().to_vec();
        out.extend_from_slice(tag);
        out.extend_from_slice(body);
        out
    }

    let raw = (creation_epoch_seconds + MAC_EPOCH_OFFSET) as u32;
    let mut mvhd = vec![0u8, 0, 0, 0];
    mvhd.extend_from_slice(&raw.to_be_bytes());
    mvhd.extend_from_slice(&raw.to_be_bytes());
    mvhd.extend_from_slice(&1000u32.to_be_bytes());
    mvhd.extend_from_slice(&120_000u32.to_be_bytes());
    mvhd.resize(100, 0);

    [
        boxed(b"ftyp", b"isom\0\0\x02\0isommp41"),
        boxed(b"moov", &boxed(b"mvhd", &mvhd)),
    ]
    .concat()
}

/// An MP4 asset held in memory.
pub(crate) fn asset_created_at(name: &str, creation_epoch_seconds: i64) -> MediaAsset {
    MediaAsset::new(
        name,
        "video/mp4",
        ByteSource::from_bytes(mp4_created_at(creation_epoch_seconds)),
    )
}
