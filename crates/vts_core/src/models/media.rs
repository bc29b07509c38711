//! Media-related data structures (assets, byte sources, container metadata).

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the bytes of a media asset live.
///
/// Both variants are opened for random access; the parser only touches
/// the leading boxes up through `moov`.
#[derive(Debug, Clone)]
pub enum ByteSource {
    /// A file on disk.
    File(PathBuf),
    /// An in-memory buffer (e.g. an upload already held by the host).
    Memory(Arc<[u8]>),
}

impl ByteSource {
    /// Create an in-memory source from owned bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Memory(Arc::from(bytes.into()))
    }
}

/// A user-selected video recording.
#[derive(Debug, Clone)]
pub struct MediaAsset {
    /// Display name (usually the original file name).
    pub name: String,
    /// Declared MIME type (e.g. "video/mp4").
    pub mime_type: String,
    /// Byte source for the container.
    pub source: ByteSource,
}

impl MediaAsset {
    /// Create a new media asset.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, source: ByteSource) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            source,
        }
    }

    /// Create an asset backed by a file, named after the file.
    pub fn from_path(path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::new(name, mime_type, ByteSource::File(path))
    }
}

/// Timing metadata read from a container's movie header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerMetadata {
    /// Creation time in Unix epoch seconds (may be negative for bogus headers).
    pub creation_time_epoch_seconds: i64,
    /// Movie duration from the header, when timescale and duration are present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

impl ContainerMetadata {
    /// Create metadata carrying only a creation time.
    pub fn new(creation_time_epoch_seconds: i64) -> Self {
        Self {
            creation_time_epoch_seconds,
            duration_seconds: None,
        }
    }

    /// Set the header duration.
    pub fn with_duration(mut self, duration_seconds: f64) -> Self {
        self.duration_seconds = Some(duration_seconds);
        self
    }

    /// Creation time as a UTC timestamp, if representable.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.creation_time_epoch_seconds, 0)
    }
}
