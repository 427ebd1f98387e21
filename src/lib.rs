//! # datazip
//!
//! Asynchronous extraction of ZIP archives embedded in base64 data URIs.
//!
//! This library takes an archive delivered as a `data:<mime>;base64,<payload>`
//! string, decodes it into memory, and extracts every file entry as UTF-8
//! text without blocking the executor: entries are processed strictly one at
//! a time, with cooperative suspension points between the expensive
//! decompression and decoding steps so other tasks keep running.
//!
//! ## Features
//!
//! - Lenient base64 decoding of data-URI payloads
//! - STORED and DEFLATE entries (DEFLATE via flate2)
//! - Directory records are recognized and skipped, never extracted
//! - Legacy DOS timestamps, falling back to the time of extraction
//! - Optional character-set conversion through encoding_rs
//! - Per-entry success/failure callbacks in central-directory order
//!
//! ## Example
//!
//! ```no_run
//! use datazip::Unzipper;
//!
//! #[tokio::main]
//! async fn main() -> datazip::Result<()> {
//!     let unzipper = Unzipper::new();
//!     let entries = unzipper.unzip("data:application/zip;base64,UEsDBA...", 4096).await?;
//!     for entry in &entries {
//!         println!("{} ({})", entry.name, entry.time);
//!     }
//!     Ok(())
//! }
//! ```

pub mod base64;
pub mod cli;
pub mod codec;
pub mod error;
pub mod zip;

pub use cli::Cli;
pub use codec::{Decompressor, EncodingConverter, EncodingRsConverter, FlateDecompressor};
pub use error::{Result, ZipError};
pub use zip::{EntryOutcome, ExtractedEntry, Unzipper};
