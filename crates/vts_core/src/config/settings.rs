//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::models::OverlapPolicy;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Video/telemetry sync behavior.
    #[serde(default)]
    pub sync: SyncSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Sync controller behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Whether a video that misses the session is rejected or only warned about.
    #[serde(default)]
    pub overlap_policy: OverlapPolicy,

    /// How long to wait for the media host to report a duration.
    #[serde(default = "default_metadata_timeout_ms")]
    pub metadata_timeout_ms: u64,

    /// Position the video at the session start once loaded.
    #[serde(default = "default_true")]
    pub seek_to_session_start: bool,
}

fn default_metadata_timeout_ms() -> u64 {
    5_000
}

fn default_true() -> bool {
    true
}

impl SyncSettings {
    /// Metadata wait bound as a `Duration`.
    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_millis(self.metadata_timeout_ms)
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            overlap_policy: OverlapPolicy::default(),
            metadata_timeout_ms: default_metadata_timeout_ms(),
            seek_to_session_start: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,
}

/// Config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Sync,
    Logging,
}

impl ConfigSection {
    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Sync => "sync",
            ConfigSection::Logging => "logging",
        }
    }

    /// All sections, in file order.
    pub fn all() -> [ConfigSection; 2] {
        [ConfigSection::Sync, ConfigSection::Logging]
    }
}
