//! Configuration management for video/telemetry sync.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Validation on load with automatic defaults
//!
//! # Example
//!
//! ```no_run
//! use vts_core::config::{ConfigManager, ConfigSection};
//! use vts_core::models::OverlapPolicy;
//!
//! // Create manager and load (or create default) config
//! let mut config = ConfigManager::new(".config/vts.toml");
//! config.load_or_create().unwrap();
//!
//! // Read settings
//! println!("Overlap policy: {}", config.settings().sync.overlap_policy);
//!
//! // Modify a setting
//! config.settings_mut().sync.overlap_policy = OverlapPolicy::Warn;
//!
//! // Save just the sync section atomically
//! config.update_section(ConfigSection::Sync).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{ConfigSection, LoggingSettings, Settings, SyncSettings};
