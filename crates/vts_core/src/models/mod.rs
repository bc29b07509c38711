//! Data models for video/telemetry sync.
//!
//! This module contains the core data structures shared by the parser,
//! the aligner and the sync controller:
//! - Enums for controller phase and overlap policy
//! - Media structures (assets, byte sources, container metadata)
//! - The telemetry session's absolute interval

mod enums;
mod media;
mod session;

// Re-export all public types
pub use enums::{OverlapPolicy, SyncPhase};
pub use media::{ByteSource, ContainerMetadata, MediaAsset};
pub use session::SessionTimeline;
