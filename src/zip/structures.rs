use chrono::{DateTime, Local, TimeZone};

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

/// End of Central Directory signature as a rolling big-endian accumulator
/// value: the byte sequence `PK\x05\x06` read MSB-first.
pub const EOCD_SCAN_SIGNATURE: u32 = 0x504B_0506;

/// The EOCD scan never looks further back than this many bytes from the end
/// of the archive. Archives with comments longer than ~255 bytes are not
/// found; a known limitation, kept for compatibility with the payloads this
/// crate was built to read.
pub const EOCD_SCAN_WINDOW: usize = 277;

/// External-attribute sentinel marking a directory entry, as written by the
/// producers this crate targets. Plain `16` (FILE_ATTRIBUTE_DIRECTORY) is
/// also honored.
pub const DIRECTORY_ATTRIBUTES: u32 = 0x41FF_0010;
pub const DOS_DIRECTORY_ATTRIBUTE: u32 = 16;

/// End of Central Directory record: the 18 bytes of fields after the
/// signature, plus the trailing archive comment.
#[derive(Debug, Clone)]
pub struct EndOfCentralDirectory {
    pub disk_number: u16,
    pub disk_start: u16,
    pub disk_entries: u16,
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
    pub comment_len: u16,
    pub comment: Vec<u8>,
}

/// Central Directory File Header: one fixed 46-byte record per entry plus
/// its variable-length name, extra block, and comment.
///
/// `modified` is derived from the packed DOS fields at parse time; `index`
/// is the 0-based position in central-directory order, assigned by the
/// pipeline.
#[derive(Debug, Clone)]
pub struct CentralFileHeader {
    pub signature: u32,
    pub version_made_by: u16,
    pub version_needed: u16,
    pub flags: u16,
    pub compression: CompressionMethod,
    pub mod_time: u16,
    pub mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub disk_number_start: u16,
    pub internal_attributes: u16,
    pub external_attributes: u32,
    pub local_header_offset: u32,
    pub filename: String,
    pub extra: Vec<u8>,
    pub comment: Vec<u8>,
    pub modified: DateTime<Local>,
    pub index: usize,
}

impl CentralFileHeader {
    /// Directory classification over the external attributes.
    ///
    /// Zero attributes always mean a regular file; only the two directory
    /// markers ever short-circuit extraction.
    pub fn is_directory(&self) -> bool {
        self.external_attributes == DIRECTORY_ATTRIBUTES
            || self.external_attributes == DOS_DIRECTORY_ATTRIBUTE
    }
}

/// Local File Header: the fixed 30-byte record preceding an entry's payload.
///
/// The re-read filename is discarded during parsing; the central directory's
/// name stays authoritative.
#[derive(Debug, Clone)]
pub struct LocalFileHeader {
    pub signature: u32,
    pub version_needed: u16,
    pub flags: u16,
    pub compression: CompressionMethod,
    pub mod_time: u16,
    pub mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
}

/// One successfully extracted non-directory entry.
#[derive(Debug, Clone)]
pub struct ExtractedEntry {
    pub name: String,
    pub data: String,
    pub time: DateTime<Local>,
}

/// Decode a packed DOS date/time pair into local calendar time.
///
/// Time bits: 15-11 hours, 10-5 minutes, 4-0 seconds/2.
/// Date bits: 15-9 years since 1980, 8-5 month, 4-0 day.
///
/// A zero in either raw field means the producer recorded no timestamp; the
/// legacy behavior of substituting the time of extraction is kept. Packed
/// values that do not form a valid calendar date fall back the same way.
pub fn dos_datetime(mod_time: u16, mod_date: u16) -> DateTime<Local> {
    if mod_time == 0 || mod_date == 0 {
        return Local::now();
    }

    let hour = u32::from((mod_time & 0xF800) >> 11);
    let minute = u32::from((mod_time & 0x07E0) >> 5);
    let second = u32::from(mod_time & 0x001F) * 2;
    let year = i32::from((mod_date & 0xFE00) >> 9) + 1980;
    let month = u32::from((mod_date & 0x01E0) >> 5);
    let day = u32::from(mod_date & 0x001F);

    Local
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
        .unwrap_or_else(Local::now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn decodes_a_packed_dos_timestamp() {
        // 2012-04-24 13:37:58
        let date = ((2012 - 1980) << 9) | (4 << 5) | 24;
        let time = (13 << 11) | (37 << 5) | (58 / 2);
        let ts = dos_datetime(time, date);
        assert_eq!((ts.year(), ts.month(), ts.day()), (2012, 4, 24));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (13, 37, 58));
    }

    #[test]
    fn zero_fields_mean_time_of_extraction() {
        let before = Local::now();
        let ts = dos_datetime(0, 0);
        assert!(ts >= before);

        // Either field being zero triggers the fallback.
        let date = ((2001 - 1980) << 9) | (1 << 5) | 1;
        assert!(dos_datetime(0, date) >= before);
        assert!(dos_datetime(1, 0) >= before);
    }

    #[test]
    fn invalid_calendar_values_fall_back() {
        let before = Local::now();
        // Month 0 / day 0 cannot form a date.
        assert!(dos_datetime(1, (5 << 9) | 1) >= before);
    }

    #[test]
    fn directory_classification() {
        let mut header = CentralFileHeader {
            signature: 0x0201_4B50,
            version_made_by: 20,
            version_needed: 20,
            flags: 0,
            compression: CompressionMethod::Stored,
            mod_time: 0,
            mod_date: 0,
            crc32: 0,
            compressed_size: 0,
            uncompressed_size: 0,
            disk_number_start: 0,
            internal_attributes: 0,
            external_attributes: 0,
            local_header_offset: 0,
            filename: "a.txt".to_string(),
            extra: Vec::new(),
            comment: Vec::new(),
            modified: Local::now(),
            index: 0,
        };
        assert!(!header.is_directory());

        header.external_attributes = DIRECTORY_ATTRIBUTES;
        assert!(header.is_directory());

        header.external_attributes = DOS_DIRECTORY_ATTRIBUTE;
        assert!(header.is_directory());

        // Arbitrary non-zero attributes are still a regular file.
        header.external_attributes = 0o100644 << 16;
        assert!(!header.is_directory());
    }
}
