//! Low-level ZIP record parsers.
//!
//! ZIP archives are read from the end:
//! 1. Scan the tail for the End of Central Directory (EOCD) record
//! 2. Walk the Central Directory to get metadata for every entry
//! 3. For extraction, re-read each entry's Local File Header and payload
//!
//! Every parser here consumes bytes from the shared [`ZipStream`]; the
//! pipeline in [`extractor`](super::extractor) is responsible for
//! positioning it before each call and for saving/restoring the directory
//! position around per-entry jumps.

use tracing::{debug, trace};

use crate::codec::EncodingConverter;
use crate::error::{Result, ZipError};

use super::stream::ZipStream;
use super::structures::*;

/// Scan the archive tail for the EOCD record and parse it.
///
/// The scan covers the last `min(len, EOCD_SCAN_WINDOW)` bytes, rolling one
/// byte at a time until the accumulator matches the signature. The window
/// cap means archives with comments longer than ~255 bytes are never found;
/// that limitation is deliberate and documented on [`EOCD_SCAN_WINDOW`].
///
/// # Errors
///
/// [`ZipError::CorruptedArchive`] when no signature appears in the window or
/// the directory the record points at does not fit in the buffer.
pub fn find_central_directory(stream: &mut ZipStream<'_>) -> Result<EndOfCentralDirectory> {
    let len = stream.len();
    let window = len.min(EOCD_SCAN_WINDOW);

    stream.seek(len - window);

    let mut acc: u32 = 0;
    let mut found = false;
    while stream.position() < len {
        let byte = stream.read(1)?[0];
        acc = (acc << 8) | u32::from(byte);
        if acc == EOCD_SCAN_SIGNATURE {
            found = true;
            break;
        }
    }
    if !found {
        return Err(ZipError::CorruptedArchive);
    }

    let eocd_pos = stream.position();
    let disk_number = stream.read_u16()?;
    let disk_start = stream.read_u16()?;
    let disk_entries = stream.read_u16()?;
    let total_entries = stream.read_u16()?;
    let cd_size = stream.read_u32()?;
    let cd_offset = stream.read_u32()?;
    let comment_len = stream.read_u16()?;
    let comment = stream.read(comment_len as usize)?.to_vec();

    // The central directory must lie inside the decoded buffer.
    let cd_end = cd_offset as usize + cd_size as usize;
    if cd_end > len {
        return Err(ZipError::CorruptedArchive);
    }

    debug!(
        eocd_pos,
        total_entries, cd_offset, cd_size, "located end of central directory"
    );

    Ok(EndOfCentralDirectory {
        disk_number,
        disk_start,
        disk_entries,
        total_entries,
        cd_size,
        cd_offset,
        comment_len,
        comment,
    })
}

/// Parse one Central Directory File Header at the current stream position.
///
/// Consumes the fixed 46-byte record, then the filename, extra block, and
/// comment. The filename is routed through `converter` when one is supplied
/// before being decoded as UTF-8 text. Names ending in `/` have their
/// external attributes forced to the directory sentinel, so they classify
/// as directories regardless of what the producer wrote.
///
/// The caller assigns `index`; the cursor ends just past the record.
pub async fn parse_central_file_header(
    stream: &mut ZipStream<'_>,
    converter: Option<&dyn EncodingConverter>,
) -> Result<CentralFileHeader> {
    let signature = stream.read_u32()?;
    let version_made_by = stream.read_u16()?;
    let version_needed = stream.read_u16()?;
    let flags = stream.read_u16()?;
    let compression = CompressionMethod::from_u16(stream.read_u16()?);
    let mod_time = stream.read_u16()?;
    let mod_date = stream.read_u16()?;
    let crc32 = stream.read_u32()?;
    let compressed_size = stream.read_u32()?;
    let uncompressed_size = stream.read_u32()?;
    let filename_len = stream.read_u16()?;
    let extra_len = stream.read_u16()?;
    let comment_len = stream.read_u16()?;
    let disk_number_start = stream.read_u16()?;
    let internal_attributes = stream.read_u16()?;
    let mut external_attributes = stream.read_u32()?;
    let local_header_offset = stream.read_u32()?;

    let filename = if filename_len == 0 {
        String::new()
    } else {
        let raw = stream.read(filename_len as usize)?.to_vec();
        let bytes = match converter {
            Some(converter) => converter.to_utf8(raw).await?,
            None => raw,
        };
        String::from_utf8_lossy(&bytes).to_string()
    };

    let extra = stream.read(extra_len as usize)?.to_vec();
    let comment = stream.read(comment_len as usize)?.to_vec();

    let modified = dos_datetime(mod_time, mod_date);

    if filename.ends_with('/') {
        external_attributes = DIRECTORY_ATTRIBUTES;
    }

    trace!(%filename, local_header_offset, "parsed central file header");

    Ok(CentralFileHeader {
        signature,
        version_made_by,
        version_needed,
        flags,
        compression,
        mod_time,
        mod_date,
        crc32,
        compressed_size,
        uncompressed_size,
        disk_number_start,
        internal_attributes,
        external_attributes,
        local_header_offset,
        filename,
        extra,
        comment,
        modified,
        index: 0,
    })
}

/// Parse the Local File Header at the current stream position and reconcile
/// it into `header`.
///
/// The cursor must already sit at the entry's `local_header_offset`; on
/// return it sits at the start of the compressed payload (the re-read name
/// and extra block are consumed and discarded).
///
/// Reconciliation: `uncompressed_size`, `compressed_size`, and `crc32` are
/// overwritten only when the local value is non-zero, so archives written
/// with trailing data descriptors keep the central directory's values.
/// Compression method, flags, and both packed timestamp fields always come
/// from the local record, and the calendar timestamp is re-derived from
/// them; where the two records disagree, local wins.
pub fn apply_local_header(
    stream: &mut ZipStream<'_>,
    header: &mut CentralFileHeader,
) -> Result<LocalFileHeader> {
    let signature = stream.read_u32()?;
    let version_needed = stream.read_u16()?;
    let flags = stream.read_u16()?;
    let compression = CompressionMethod::from_u16(stream.read_u16()?);
    let mod_time = stream.read_u16()?;
    let mod_date = stream.read_u16()?;
    let crc32 = stream.read_u32()?;
    let compressed_size = stream.read_u32()?;
    let uncompressed_size = stream.read_u32()?;
    let filename_len = stream.read_u16()?;
    let extra_len = stream.read_u16()?;

    // Skip past the re-read name and extra block; the central directory's
    // filename stays authoritative.
    stream.read(filename_len as usize + extra_len as usize)?;

    let local = LocalFileHeader {
        signature,
        version_needed,
        flags,
        compression,
        mod_time,
        mod_date,
        crc32,
        compressed_size,
        uncompressed_size,
    };

    if local.uncompressed_size != 0 {
        header.uncompressed_size = local.uncompressed_size;
    }
    if local.compressed_size != 0 {
        header.compressed_size = local.compressed_size;
    }
    if local.crc32 != 0 {
        header.crc32 = local.crc32;
    }

    header.compression = local.compression;
    header.flags = local.flags;
    header.mod_time = local.mod_time;
    header.mod_date = local.mod_date;
    header.modified = dos_datetime(local.mod_time, local.mod_date);

    trace!(
        name = %header.filename,
        compression = header.compression.as_u16(),
        compressed_size = header.compressed_size,
        "reconciled local file header"
    );

    Ok(local)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eocd_bytes(total_entries: u16, cd_size: u32, cd_offset: u32, comment: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"PK\x05\x06");
        out.extend_from_slice(&0u16.to_le_bytes()); // disk number
        out.extend_from_slice(&0u16.to_le_bytes()); // disk start
        out.extend_from_slice(&total_entries.to_le_bytes());
        out.extend_from_slice(&total_entries.to_le_bytes());
        out.extend_from_slice(&cd_size.to_le_bytes());
        out.extend_from_slice(&cd_offset.to_le_bytes());
        out.extend_from_slice(&(comment.len() as u16).to_le_bytes());
        out.extend_from_slice(comment);
        out
    }

    #[test]
    fn finds_the_eocd_at_the_tail() {
        let mut archive = vec![0u8; 40];
        archive.extend_from_slice(&eocd_bytes(3, 10, 30, b"hello"));

        let mut stream = ZipStream::new(&archive);
        let eocd = find_central_directory(&mut stream).unwrap();
        assert_eq!(eocd.total_entries, 3);
        assert_eq!(eocd.cd_size, 10);
        assert_eq!(eocd.cd_offset, 30);
        assert_eq!(eocd.comment, b"hello");
    }

    #[test]
    fn finds_the_eocd_behind_a_short_comment() {
        let mut archive = vec![0u8; 100];
        archive.extend_from_slice(&eocd_bytes(1, 0, 100, &[b'x'; 200]));

        let mut stream = ZipStream::new(&archive);
        let eocd = find_central_directory(&mut stream).unwrap();
        assert_eq!(eocd.comment_len, 200);
    }

    #[test]
    fn eocd_beyond_the_scan_window_is_not_found() {
        // A comment long enough to push the record out of the 277-byte
        // window; a documented limitation, not a bug.
        let mut archive = vec![0u8; 10];
        archive.extend_from_slice(&eocd_bytes(1, 0, 10, &[b'x'; 300]));

        let mut stream = ZipStream::new(&archive);
        assert!(matches!(
            find_central_directory(&mut stream),
            Err(ZipError::CorruptedArchive)
        ));
    }

    #[test]
    fn missing_signature_is_a_corrupted_archive() {
        let archive = vec![0xABu8; 64];
        let mut stream = ZipStream::new(&archive);
        assert!(matches!(
            find_central_directory(&mut stream),
            Err(ZipError::CorruptedArchive)
        ));
    }

    #[test]
    fn directory_that_overruns_the_buffer_is_corrupted() {
        let mut archive = vec![0u8; 8];
        archive.extend_from_slice(&eocd_bytes(1, 500, 4, b""));

        let mut stream = ZipStream::new(&archive);
        assert!(matches!(
            find_central_directory(&mut stream),
            Err(ZipError::CorruptedArchive)
        ));
    }

    #[test]
    fn works_on_buffers_shorter_than_the_window() {
        let archive = eocd_bytes(0, 0, 0, b"");
        let mut stream = ZipStream::new(&archive);
        let eocd = find_central_directory(&mut stream).unwrap();
        assert_eq!(eocd.total_entries, 0);
    }
}
