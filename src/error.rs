//! Error types shared across the crate.

use thiserror::Error;

/// A Result type alias over [`ZipError`] to minimise repetition.
pub type Result<V> = std::result::Result<V, ZipError>;

/// Errors produced while locating, parsing, or extracting archive entries.
///
/// A directory entry is not an error: the extractor reports it through
/// [`EntryOutcome::Directory`](crate::zip::EntryOutcome::Directory) and the
/// pipeline silently skips it.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ZipError {
    /// No end-of-central-directory signature within the tail scan window.
    #[error("corrupted archive: end of central directory record not found")]
    CorruptedArchive,

    /// A cursor read ran past the end of the decoded archive buffer.
    #[error("read of {wanted} bytes at offset {offset} exceeds buffer of {len} bytes")]
    OutOfRangeRead {
        offset: usize,
        wanted: usize,
        len: usize,
    },

    /// An entry failed somewhere between its local header and text decode.
    #[error("failed to extract '{name}': {reason}")]
    Extraction { name: String, reason: String },

    /// The decompression collaborator rejected an entry payload.
    #[error("decompression failed: {0}")]
    Decompress(#[source] std::io::Error),

    /// The encoding-conversion collaborator rejected an entry payload.
    #[error("encoding conversion failed: {0}")]
    EncodingConversion(String),

    /// Decompressed entry bytes were not valid UTF-8 text.
    #[error("entry data is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl ZipError {
    /// Wrap any entry-level failure with the name of the entry it hit.
    pub(crate) fn for_entry(self, name: &str) -> ZipError {
        match self {
            // Already carries the entry name.
            err @ ZipError::Extraction { .. } => err,
            err => ZipError::Extraction {
                name: name.to_string(),
                reason: err.to_string(),
            },
        }
    }
}
