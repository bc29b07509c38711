//! Creation-time extraction from the `moov`/`mvhd` boxes.

use std::io::{Cursor, SeekFrom};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

use super::boxes::{find_box, BoxHeader, Scope};
use super::error::{ContainerError, ContainerResult};
use crate::models::{ByteSource, ContainerMetadata};

/// Seconds between 1904-01-01T00:00:00Z and 1970-01-01T00:00:00Z.
pub const MAC_EPOCH_OFFSET: i64 = 2_082_844_800;

const MOOV: &[u8; 4] = b"moov";
const MVHD: &[u8; 4] = b"mvhd";

/// Duration value meaning "unknown" in a version-0 header.
const UNKNOWN_DURATION_V0: u64 = u32::MAX as u64;

/// Duration value meaning "unknown" in a version-1 header.
const UNKNOWN_DURATION_V1: u64 = u64::MAX;

/// Read container metadata from a media asset's byte source.
///
/// Files are opened for random access; nothing past `moov` is read.
pub async fn read_source_metadata(source: &ByteSource) -> ContainerResult<ContainerMetadata> {
    match source {
        ByteSource::File(path) => {
            tracing::debug!("Reading container metadata from {}", path.display());
            let mut file = tokio::fs::File::open(path).await?;
            read_creation_time(&mut file).await
        }
        ByteSource::Memory(bytes) => {
            tracing::debug!("Reading container metadata from {} buffered bytes", bytes.len());
            let mut cursor = Cursor::new(bytes.clone());
            read_creation_time(&mut cursor).await
        }
    }
}

/// Read the creation time (and header duration, if present) from a container.
///
/// # Errors
///
/// * `MetadataNotFound` - no `moov` box before the end of the source, or a
///   size-0 box ends the scan first
/// * `Malformed` - `mvhd` missing from `moov`, truncated data, or
///   inconsistent box sizes
/// * `Io` - the source failed for reasons other than end-of-file
pub async fn read_creation_time<R>(reader: &mut R) -> ContainerResult<ContainerMetadata>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    let moov = find_box(reader, Scope::top_level(), MOOV)
        .await?
        .ok_or(ContainerError::MetadataNotFound)?;

    let mvhd = find_box(reader, Scope::body_of(&moov), MVHD)
        .await?
        .ok_or_else(|| ContainerError::malformed(moov.start, "'moov' box has no 'mvhd' header"))?;

    tracing::debug!("Found mvhd at byte {} inside moov at {}", mvhd.start, moov.start);

    read_movie_header(reader, &mvhd).await
}

/// Decode the timing fields of an `mvhd` box.
///
/// Layout after the box header: 1-byte version, 3 flag bytes, then
/// creation time, modification time, timescale and duration. Times are
/// 32-bit in version 0 and 64-bit in version 1.
async fn read_movie_header<R>(reader: &mut R, mvhd: &BoxHeader) -> ContainerResult<ContainerMetadata>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    let base = mvhd.body_start();
    let version = read_field::<R, 1>(reader, mvhd, base).await?[0];

    let raw_creation = match version {
        0 => u64::from(read_u32(reader, mvhd, base + 4).await?),
        1 => {
            let high = read_u32(reader, mvhd, base + 4).await?;
            let low = read_u32(reader, mvhd, base + 8).await?;
            (u64::from(high) << 32) | u64::from(low)
        }
        v => {
            return Err(ContainerError::malformed(
                base,
                format!("unsupported mvhd version {v}"),
            ));
        }
    };

    let creation_time = i64::try_from(raw_creation)
        .map(|t| t - MAC_EPOCH_OFFSET)
        .map_err(|_| {
            ContainerError::malformed(base + 4, format!("creation time {raw_creation} out of range"))
        })?;

    let mut meta = ContainerMetadata::new(creation_time);
    if let Some(duration) = read_header_duration(reader, mvhd, version).await {
        meta = meta.with_duration(duration);
    }

    tracing::debug!(
        "mvhd v{}: creation time {} (raw {}), duration {:?}",
        version,
        creation_time,
        raw_creation,
        meta.duration_seconds
    );

    Ok(meta)
}

/// Read timescale and duration; any problem yields `None`.
async fn read_header_duration<R>(reader: &mut R, mvhd: &BoxHeader, version: u8) -> Option<f64>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    let base = mvhd.body_start();
    let (timescale, duration) = if version == 1 {
        let timescale = read_u32(reader, mvhd, base + 20).await.ok()?;
        let duration = read_u64(reader, mvhd, base + 24).await.ok()?;
        (timescale, (duration != UNKNOWN_DURATION_V1).then_some(duration)?)
    } else {
        let timescale = read_u32(reader, mvhd, base + 12).await.ok()?;
        let duration = u64::from(read_u32(reader, mvhd, base + 16).await.ok()?);
        (timescale, (duration != UNKNOWN_DURATION_V0).then_some(duration)?)
    };

    if timescale == 0 {
        return None;
    }
    Some(duration as f64 / f64::from(timescale))
}

/// Read `N` bytes at `offset`, which must lie inside the `mvhd` box.
async fn read_field<R, const N: usize>(
    reader: &mut R,
    mvhd: &BoxHeader,
    offset: u64,
) -> ContainerResult<[u8; N]>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    if let Some(end) = mvhd.end() {
        if offset + N as u64 > end {
            return Err(ContainerError::malformed(
                offset,
                format!("mvhd field extends past the box end at {end}"),
            ));
        }
    }

    reader.seek(SeekFrom::Start(offset)).await?;
    let mut buf = [0u8; N];
    reader
        .read_exact(&mut buf)
        .await
        .map_err(|e| ContainerError::from_read(e, offset, "mvhd field"))?;
    Ok(buf)
}

async fn read_u32<R>(reader: &mut R, mvhd: &BoxHeader, offset: u64) -> ContainerResult<u32>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    read_field::<R, 4>(reader, mvhd, offset)
        .await
        .map(u32::from_be_bytes)
}

async fn read_u64<R>(reader: &mut R, mvhd: &BoxHeader, offset: u64) -> ContainerResult<u64>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    read_field::<R, 8>(reader, mvhd, offset)
        .await
        .map(u64::from_be_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_tracing;
    use std::io::Write;

    fn boxed(tag: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(body.len() + 8);
        out.extend_from_slice(&((body.len() + 8) as u32).to_be_bytes());
        out.extend_from_slice(tag);
        out.extend_from_slice(body);
        out
    }

    /// Full-size version-0 movie header.
    fn mvhd_v0(creation: u32, timescale: u32, duration: u32) -> Vec<u8> {
        let mut body = vec![0u8, 0, 0, 0];
        body.extend_from_slice(&creation.to_be_bytes());
        body.extend_from_slice(&creation.to_be_bytes());
        body.extend_from_slice(&timescale.to_be_bytes());
        body.extend_from_slice(&duration.to_be_bytes());
        body.resize(100, 0);
        boxed(b"mvhd", &body)
    }

    fn mvhd_v1(high: u32, low: u32, timescale: u32, duration: u64) -> Vec<u8> {
        let mut body = vec![1u8, 0, 0, 0];
        for _ in 0..2 {
            body.extend_from_slice(&high.to_be_bytes());
            body.extend_from_slice(&low.to_be_bytes());
        }
        body.extend_from_slice(&timescale.to_be_bytes());
        body.extend_from_slice(&duration.to_be_bytes());
        body.resize(112, 0);
        boxed(b"mvhd", &body)
    }

    fn ftyp() -> Vec<u8> {
        boxed(b"ftyp", b"isom\0\0\x02\0isomiso2avc1mp41")
    }

    async fn parse(bytes: Vec<u8>) -> ContainerResult<ContainerMetadata> {
        init_test_tracing();
        read_creation_time(&mut Cursor::new(bytes)).await
    }

    #[tokio::test]
    async fn version_0_timestamp_of_one() {
        let file = [ftyp(), boxed(b"moov", &mvhd_v0(1, 1000, 0))].concat();
        let meta = parse(file).await.unwrap();
        assert_eq!(meta.creation_time_epoch_seconds, 1 - MAC_EPOCH_OFFSET);
        assert_eq!(meta.creation_time_epoch_seconds, -2_082_844_799);
    }

    #[tokio::test]
    async fn version_0_converts_to_unix_epoch() {
        let raw = (1_700_000_000 + MAC_EPOCH_OFFSET) as u32;
        let file = [ftyp(), boxed(b"moov", &mvhd_v0(raw, 1000, 90_500))].concat();
        let meta = parse(file).await.unwrap();
        assert_eq!(meta.creation_time_epoch_seconds, 1_700_000_000);
        assert_eq!(meta.duration_seconds, Some(90.5));
    }

    #[tokio::test]
    async fn version_1_combines_high_and_low_words() {
        let file = [ftyp(), boxed(b"moov", &mvhd_v1(1, 5, 600, 36_000))].concat();
        let meta = parse(file).await.unwrap();
        assert_eq!(
            meta.creation_time_epoch_seconds,
            (1i64 << 32) + 5 - MAC_EPOCH_OFFSET
        );
        assert_eq!(meta.duration_seconds, Some(60.0));
    }

    #[tokio::test]
    async fn skips_mdat_before_moov() {
        let mdat = boxed(b"mdat", &vec![0xAB; 4096]);
        let raw = (1_600_000_000 + MAC_EPOCH_OFFSET) as u32;
        let file = [ftyp(), mdat, boxed(b"moov", &mvhd_v0(raw, 1, 10))].concat();
        let meta = parse(file).await.unwrap();
        assert_eq!(meta.creation_time_epoch_seconds, 1_600_000_000);
    }

    #[tokio::test]
    async fn skips_extended_size_box() {
        let mut mdat = vec![0, 0, 0, 1, b'm', b'd', b'a', b't'];
        mdat.extend_from_slice(&(16u64 + 32).to_be_bytes());
        mdat.extend_from_slice(&[0u8; 32]);
        let raw = (1_600_000_000 + MAC_EPOCH_OFFSET) as u32;
        let file = [ftyp(), mdat, boxed(b"moov", &mvhd_v0(raw, 1, 10))].concat();
        let meta = parse(file).await.unwrap();
        assert_eq!(meta.creation_time_epoch_seconds, 1_600_000_000);
    }

    #[tokio::test]
    async fn finds_mvhd_after_other_children() {
        let trak = boxed(b"trak", &[0u8; 24]);
        let moov_body = [trak, mvhd_v0(MAC_EPOCH_OFFSET as u32, 1, 1)].concat();
        let file = [ftyp(), boxed(b"moov", &moov_body)].concat();
        let meta = parse(file).await.unwrap();
        assert_eq!(meta.creation_time_epoch_seconds, 0);
    }

    #[tokio::test]
    async fn zero_size_box_before_moov_is_not_found() {
        let mut open_ended = vec![0, 0, 0, 0, b'm', b'd', b'a', b't'];
        open_ended.extend_from_slice(&[0u8; 64]);
        let file = [ftyp(), open_ended, boxed(b"moov", &mvhd_v0(1, 1, 1))].concat();
        let err = parse(file).await.unwrap_err();
        assert!(matches!(err, ContainerError::MetadataNotFound));
    }

    #[tokio::test]
    async fn missing_moov_is_not_found() {
        let file = [ftyp(), boxed(b"free", &[0u8; 8])].concat();
        assert!(matches!(
            parse(file).await.unwrap_err(),
            ContainerError::MetadataNotFound
        ));
    }

    #[tokio::test]
    async fn empty_source_is_not_found() {
        assert!(matches!(
            parse(Vec::new()).await.unwrap_err(),
            ContainerError::MetadataNotFound
        ));
    }

    #[tokio::test]
    async fn moov_without_mvhd_is_malformed() {
        let file = [ftyp(), boxed(b"moov", &boxed(b"trak", &[0u8; 16]))].concat();
        let err = parse(file).await.unwrap_err();
        assert!(matches!(err, ContainerError::Malformed { .. }));
        assert!(err.to_string().contains("mvhd"));
    }

    #[tokio::test]
    async fn truncated_mvhd_is_malformed() {
        // Declares a full header but the source stops after the version byte.
        let mut file = ftyp();
        file.extend_from_slice(&116u32.to_be_bytes());
        file.extend_from_slice(b"moov");
        file.extend_from_slice(&108u32.to_be_bytes());
        file.extend_from_slice(b"mvhd");
        file.extend_from_slice(&[0, 0, 0, 0, 0, 0]);

        let err = parse(file).await.unwrap_err();
        assert!(matches!(err, ContainerError::Malformed { .. }));
    }

    #[tokio::test]
    async fn mvhd_too_small_for_timestamp_is_malformed() {
        let tiny = boxed(b"mvhd", &[0, 0, 0, 0, 0, 0]);
        let file = [ftyp(), boxed(b"moov", &tiny)].concat();
        let err = parse(file).await.unwrap_err();
        assert!(err.to_string().contains("past the box end"));
    }

    #[tokio::test]
    async fn short_mvhd_keeps_timestamp_without_duration() {
        let raw = (1_650_000_000 + MAC_EPOCH_OFFSET) as u32;
        let mut body = vec![0u8, 0, 0, 0];
        body.extend_from_slice(&raw.to_be_bytes());
        let file = [ftyp(), boxed(b"moov", &boxed(b"mvhd", &body))].concat();

        let meta = parse(file).await.unwrap();
        assert_eq!(meta.creation_time_epoch_seconds, 1_650_000_000);
        assert_eq!(meta.duration_seconds, None);
    }

    #[tokio::test]
    async fn unknown_version_is_malformed() {
        let mut mvhd = mvhd_v0(1, 1, 1);
        mvhd[8] = 7;
        let file = [ftyp(), boxed(b"moov", &mvhd)].concat();
        let err = parse(file).await.unwrap_err();
        assert!(err.to_string().contains("version 7"));
    }

    #[tokio::test]
    async fn zero_timescale_has_no_duration() {
        let file = [ftyp(), boxed(b"moov", &mvhd_v0(1, 0, 500))].concat();
        assert_eq!(parse(file).await.unwrap().duration_seconds, None);
    }

    #[tokio::test]
    async fn reads_from_file_source() {
        let raw = (1_700_000_123 + MAC_EPOCH_OFFSET) as u32;
        let bytes = [ftyp(), boxed(b"moov", &mvhd_v0(raw, 1000, 5000))].concat();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        file.flush().unwrap();

        let meta = read_source_metadata(&ByteSource::File(file.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(meta.creation_time_epoch_seconds, 1_700_000_123);
        assert_eq!(meta.duration_seconds, Some(5.0));
    }

    #[tokio::test]
    async fn reads_from_memory_source() {
        let bytes = [ftyp(), boxed(b"moov", &mvhd_v0(1, 1, 1))].concat();
        let meta = read_source_metadata(&ByteSource::from_bytes(bytes))
            .await
            .unwrap();
        assert_eq!(meta.creation_time_epoch_seconds, -2_082_844_799);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let source = ByteSource::File("/nonexistent/ride.mp4".into());
        let err = read_source_metadata(&source).await.unwrap_err();
        assert!(matches!(err, ContainerError::Io(_)));
    }
}
