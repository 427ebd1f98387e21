//! ZIP archive parsing and extraction.
//!
//! ## Architecture
//!
//! The module is organized into four components:
//!
//! - [`stream`]: the shared byte cursor all parsing goes through
//! - [`structures`]: data structures for ZIP format elements (EOCD, file headers)
//! - [`parser`]: low-level parsing of ZIP records from the cursor
//! - [`extractor`]: the sequential asynchronous extraction pipeline
//!
//! ## ZIP format overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. A Central Directory with metadata for all files
//! 3. An End of Central Directory (EOCD) record at the end
//!
//! Extraction starts at the EOCD, walks the central directory, and jumps
//! to each entry's local header for the payload, restoring the directory
//! cursor between entries.
//!
//! ## Supported features
//!
//! - Standard ZIP format, read entirely from memory
//! - STORED (no compression) and DEFLATE methods
//! - Legacy DOS timestamps, with time-of-extraction fallback
//! - Optional character-set conversion of names and payloads
//!
//! ## Limitations
//!
//! - No ZIP64 or multi-disk archives
//! - No encryption support
//! - EOCD scan is capped at the last 277 bytes, so archives with comments
//!   longer than ~255 bytes are not recognized

mod extractor;
mod parser;
mod stream;
mod structures;

pub use extractor::{
    DEFAULT_PAUSE_AFTER_DECODE, DEFAULT_PAUSE_AFTER_DECOMPRESS, EntryOutcome, Unzipper,
};
pub use parser::{apply_local_header, find_central_directory, parse_central_file_header};
pub use stream::ZipStream;
pub use structures::*;
