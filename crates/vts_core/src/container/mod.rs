//! Container metadata parsing.
//!
//! Reads the absolute creation time of an ISO-BMFF style container
//! (MP4/MOV) by walking its box structure:
//! - Top-level boxes are skipped by seeking until `moov` is found
//! - Inside `moov`, the `mvhd` movie header carries the timestamps
//! - Header times count from 1904-01-01 and are converted to Unix epoch
//!
//! Only the leading boxes are read; large `mdat` payloads are never
//! loaded, whether they appear before or after `moov`.
//!
//! # Example
//!
//! ```no_run
//! use vts_core::container::read_source_metadata;
//! use vts_core::models::ByteSource;
//!
//! # async fn run() -> Result<(), vts_core::container::ContainerError> {
//! let source = ByteSource::File("ride.mp4".into());
//! let meta = read_source_metadata(&source).await?;
//! println!("Recorded at {}", meta.creation_time_epoch_seconds);
//! # Ok(())
//! # }
//! ```

mod boxes;
mod error;
mod parser;

pub use boxes::{BoxHeader, FourCc};
pub use error::{ContainerError, ContainerResult};
pub use parser::{read_creation_time, read_source_metadata, MAC_EPOCH_OFFSET};
