//! External collaborators consumed by the extraction pipeline.
//!
//! The pipeline owns the ZIP plumbing; the actual DEFLATE algorithm and any
//! character-set conversion tables live behind these traits. Both are
//! modelled as asynchronous even when an implementation resolves
//! immediately, so the pipeline schedules every entry the same way.

mod deflate;
mod encoding;

pub use deflate::FlateDecompressor;
pub use encoding::EncodingRsConverter;

use async_trait::async_trait;

use crate::error::Result;

/// Inflates one entry's compressed payload.
///
/// Method 0 (stored) never reaches the decompressor; anything else is handed
/// over whole. The shipped implementation handles method 8 (raw DEFLATE).
#[async_trait]
pub trait Decompressor: Send + Sync {
    async fn inflate(&self, data: Vec<u8>) -> Result<Vec<u8>>;
}

/// Converts entry bytes from a legacy character set to UTF-8 bytes.
///
/// Optional: a pipeline without a converter passes payloads and filenames
/// through untouched.
#[async_trait]
pub trait EncodingConverter: Send + Sync {
    async fn to_utf8(&self, data: Vec<u8>) -> Result<Vec<u8>>;
}
