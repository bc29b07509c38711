//! Box header reading and sequential box scanning.
//!
//! A box starts with a 4-byte big-endian size followed by a 4-byte type
//! tag. Size `0` means the box runs to the end of its enclosing scope and
//! size `1` means a 64-bit size follows the tag.

use std::io::SeekFrom;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

use super::error::{ContainerError, ContainerResult};

/// A four-character box type tag.
pub type FourCc = [u8; 4];

/// Compact header length (size + type).
const COMPACT_HEADER_LEN: u64 = 8;

/// Header length when a 64-bit size follows the type.
const EXTENDED_HEADER_LEN: u64 = 16;

/// A parsed box header and its position in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxHeader {
    /// Four-character type tag.
    pub box_type: FourCc,
    /// Absolute offset of the first header byte.
    pub start: u64,
    /// Header length in bytes (8, or 16 with an extended size).
    pub header_len: u64,
    /// Total box size including the header; `None` when it runs to the end.
    pub size: Option<u64>,
}

impl BoxHeader {
    /// Whether this box carries the given type tag.
    pub fn is(&self, tag: &FourCc) -> bool {
        &self.box_type == tag
    }

    /// Type tag as text (non-ASCII bytes are replaced).
    pub fn type_name(&self) -> String {
        String::from_utf8_lossy(&self.box_type).into_owned()
    }

    /// Absolute offset of the first body byte.
    pub fn body_start(&self) -> u64 {
        self.start + self.header_len
    }

    /// Absolute offset one past the last byte, if the size is known.
    pub fn end(&self) -> Option<u64> {
        self.size.map(|size| self.start.saturating_add(size))
    }
}

/// A byte range to scan for sibling boxes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope {
    pub start: u64,
    /// `None` for the top level or a parent that runs to end of source.
    pub end: Option<u64>,
}

impl Scope {
    /// The whole source.
    pub fn top_level() -> Self {
        Self {
            start: 0,
            end: None,
        }
    }

    /// The body of a parent box.
    pub fn body_of(parent: &BoxHeader) -> Self {
        Self {
            start: parent.body_start(),
            end: parent.end(),
        }
    }
}

/// Read as many bytes as are available into `buf`, stopping at end-of-file.
///
/// Returns the number of bytes read.
async fn read_available<R>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Read the box header at `pos`.
///
/// Returns `Ok(None)` on a clean end of source (no bytes at all at `pos`).
pub(crate) async fn read_header<R>(reader: &mut R, pos: u64) -> ContainerResult<Option<BoxHeader>>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    reader.seek(SeekFrom::Start(pos)).await?;

    let mut buf = [0u8; COMPACT_HEADER_LEN as usize];
    let filled = read_available(reader, &mut buf).await?;
    if filled == 0 {
        return Ok(None);
    }
    if filled < buf.len() {
        return Err(ContainerError::malformed(
            pos,
            format!("truncated box header ({} of {} bytes)", filled, buf.len()),
        ));
    }

    let size32 = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let box_type = [buf[4], buf[5], buf[6], buf[7]];

    let (size, header_len) = match size32 {
        0 => (None, COMPACT_HEADER_LEN),
        1 => {
            let mut ext = [0u8; 8];
            reader.read_exact(&mut ext).await.map_err(|e| {
                ContainerError::from_read(e, pos + COMPACT_HEADER_LEN, "extended box size")
            })?;
            (Some(u64::from_be_bytes(ext)), EXTENDED_HEADER_LEN)
        }
        n => (Some(u64::from(n)), COMPACT_HEADER_LEN),
    };

    let header = BoxHeader {
        box_type,
        start: pos,
        header_len,
        size,
    };

    if let Some(size) = size {
        if size < header_len {
            return Err(ContainerError::malformed(
                pos,
                format!(
                    "box '{}' declares size {} smaller than its {}-byte header",
                    header.type_name(),
                    size,
                    header_len
                ),
            ));
        }
    }

    Ok(Some(header))
}

/// Scan the boxes of `scope` in order and return the first tagged `tag`.
///
/// Returns `Ok(None)` when the scope is exhausted without a match, or when
/// a non-matching box runs to the end of the scope (size `0`).
pub(crate) async fn find_box<R>(
    reader: &mut R,
    scope: Scope,
    tag: &FourCc,
) -> ContainerResult<Option<BoxHeader>>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    let mut pos = scope.start;

    loop {
        if let Some(end) = scope.end {
            if pos >= end {
                return Ok(None);
            }
        }

        let header = match read_header(reader, pos).await? {
            Some(header) => header,
            None if scope.end.is_some() => {
                return Err(ContainerError::malformed(
                    pos,
                    "source ends inside its parent box",
                ));
            }
            None => return Ok(None),
        };

        if let (Some(parent_end), Some(box_end)) = (scope.end, header.end()) {
            if box_end > parent_end {
                return Err(ContainerError::malformed(
                    pos,
                    format!("box '{}' overruns its parent", header.type_name()),
                ));
            }
        }

        tracing::trace!(
            "Box '{}' at {} (size {:?})",
            header.type_name(),
            header.start,
            header.size
        );

        if header.is(tag) {
            return Ok(Some(header));
        }

        match header.end() {
            Some(next) => pos = next,
            None => return Ok(None),
        }
    }
}
