//! Container parsing error types.

use std::io;

use thiserror::Error;

/// Errors that can occur while reading container metadata.
#[derive(Error, Debug)]
pub enum ContainerError {
    /// No `moov` box before the end of the source.
    #[error("No movie metadata found in container")]
    MetadataNotFound,

    /// Truncated or structurally invalid box data.
    #[error("Malformed container at byte {offset}: {message}")]
    Malformed { offset: u64, message: String },

    /// The byte source itself failed.
    #[error("Failed to read container: {0}")]
    Io(#[from] io::Error),
}

impl ContainerError {
    /// Create a malformed container error.
    pub fn malformed(offset: u64, message: impl Into<String>) -> Self {
        Self::Malformed {
            offset,
            message: message.into(),
        }
    }

    /// Map a failed exact read, treating end-of-file as truncation.
    pub(crate) fn from_read(err: io::Error, offset: u64, what: &str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::malformed(offset, format!("truncated {what}"))
        } else {
            Self::Io(err)
        }
    }
}

/// Result type for container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;
