//! The extraction pipeline.
//!
//! [`Unzipper`] drives the whole run: base64 decode, EOCD location, and a
//! strictly sequential walk of the central directory. Entries share one
//! [`ZipStream`], so entry N+1 never starts until entry N has finished,
//! been skipped as a directory, or failed. The directory position is saved
//! before each jump to a local header and restored afterwards.
//!
//! Two cooperative suspension points per entry keep long archives from
//! monopolizing the executor: one after decompression and one after text
//! decode. Their ordering is the contract; the durations are tunable.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, trace};

use crate::base64;
use crate::codec::{Decompressor, EncodingConverter, FlateDecompressor};
use crate::error::{Result, ZipError};

use super::parser;
use super::stream::ZipStream;
use super::structures::{CentralFileHeader, CompressionMethod, ExtractedEntry};

/// Default pause after the decompression step.
pub const DEFAULT_PAUSE_AFTER_DECOMPRESS: Duration = Duration::from_micros(500);

/// Default pause after the text-decode step. Kept at twice the
/// post-decompression pause, the ratio the legacy pipeline used.
pub const DEFAULT_PAUSE_AFTER_DECODE: Duration = Duration::from_millis(1);

/// What became of a single directory entry.
///
/// Directory records are an expected outcome, not a failure; modelling them
/// as a variant keeps the skip path out of the error channel entirely.
pub enum EntryOutcome {
    /// A regular file, fully decoded.
    File(ExtractedEntry),
    /// A directory record; nothing to extract, no callback fires.
    Directory,
}

/// Asynchronous extractor for ZIP archives supplied as base64 data URIs.
///
/// ## Example
///
/// ```no_run
/// use datazip::Unzipper;
///
/// #[tokio::main]
/// async fn main() -> datazip::Result<()> {
///     let unzipper = Unzipper::new();
///     let entries = unzipper.unzip("data:application/zip;base64,UEsDBA...", 1024).await?;
///     for entry in &entries {
///         println!("{}: {} bytes", entry.name, entry.data.len());
///     }
///     Ok(())
/// }
/// ```
pub struct Unzipper {
    decompressor: Arc<dyn Decompressor>,
    converter: Option<Arc<dyn EncodingConverter>>,
    pause_after_decompress: Duration,
    pause_after_decode: Duration,
}

impl Default for Unzipper {
    fn default() -> Self {
        Self::new()
    }
}

impl Unzipper {
    /// An extractor with the flate2-backed decompressor and no character-set
    /// conversion.
    pub fn new() -> Self {
        Self {
            decompressor: Arc::new(FlateDecompressor),
            converter: None,
            pause_after_decompress: DEFAULT_PAUSE_AFTER_DECOMPRESS,
            pause_after_decode: DEFAULT_PAUSE_AFTER_DECODE,
        }
    }

    /// Replace the decompression collaborator.
    pub fn with_decompressor(mut self, decompressor: Arc<dyn Decompressor>) -> Self {
        self.decompressor = decompressor;
        self
    }

    /// Enable character-set conversion of filenames and entry payloads.
    ///
    /// Without a converter both pass through byte-for-byte.
    pub fn with_encoding_converter(mut self, converter: Arc<dyn EncodingConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Tune the two per-entry suspension pauses.
    pub fn with_pauses(mut self, after_decompress: Duration, after_decode: Duration) -> Self {
        self.pause_after_decompress = after_decompress;
        self.pause_after_decode = after_decode;
        self
    }

    /// Extract every non-directory entry of the archive, in central
    /// directory order.
    ///
    /// `data_uri` is a `data:<mime>;base64,<payload>` string (a bare payload
    /// also works); `expected_len` is the decoded byte length of the
    /// archive.
    ///
    /// The result is all-or-nothing: the full ordered list, or the first
    /// unrecoverable error with no partial output.
    pub async fn unzip(&self, data_uri: &str, expected_len: usize) -> Result<Vec<ExtractedEntry>> {
        self.unzip_with_callbacks(data_uri, expected_len, |_| {}, |_| {})
            .await
    }

    /// Like [`unzip`](Self::unzip), with per-entry callbacks.
    ///
    /// `on_entry` fires in pipeline order for each successfully extracted
    /// file; `on_error` fires once, with the failure that aborts the run,
    /// before that failure is returned. Directory skips fire neither.
    pub async fn unzip_with_callbacks<F, E>(
        &self,
        data_uri: &str,
        expected_len: usize,
        mut on_entry: F,
        mut on_error: E,
    ) -> Result<Vec<ExtractedEntry>>
    where
        F: FnMut(&ExtractedEntry),
        E: FnMut(&ZipError),
    {
        let buffer = base64::decode(base64::data_uri_payload(data_uri), expected_len);
        let mut stream = ZipStream::new(&buffer);

        let eocd = parser::find_central_directory(&mut stream)?;
        debug!(entries = eocd.total_entries, "starting extraction");

        let mut results = Vec::new();
        let mut directory_pos = eocd.cd_offset as usize;

        for index in 0..eocd.total_entries as usize {
            stream.seek(directory_pos);
            let mut header =
                parser::parse_central_file_header(&mut stream, self.converter.as_deref()).await?;
            header.index = index;

            // Save the directory position, jump to the entry's local header,
            // and restore before the next central record is parsed.
            directory_pos = stream.position();
            stream.seek(header.local_header_offset as usize);

            match self.extract_entry(&mut stream, &mut header).await {
                Ok(EntryOutcome::File(entry)) => {
                    on_entry(&entry);
                    results.push(entry);
                }
                Ok(EntryOutcome::Directory) => {
                    trace!(name = %header.filename, "skipping directory entry");
                }
                Err(err) => {
                    // Only failures that carry a message reach the callback;
                    // every error this crate produces does.
                    if !err.to_string().is_empty() {
                        on_error(&err);
                    }
                    return Err(err);
                }
            }
        }

        debug!(extracted = results.len(), "extraction finished");
        Ok(results)
    }

    /// Run one entry through the extraction state machine.
    ///
    /// header read -> classify -> payload read -> decompress -> encoding
    /// conversion -> text decode, with the directory short-circuit at
    /// classification. The cursor must sit at the entry's local header.
    async fn extract_entry(
        &self,
        stream: &mut ZipStream<'_>,
        header: &mut CentralFileHeader,
    ) -> Result<EntryOutcome> {
        parser::apply_local_header(stream, header).map_err(|e| e.for_entry(&header.filename))?;

        if header.is_directory() {
            return Ok(EntryOutcome::Directory);
        }

        let payload = stream
            .read(header.compressed_size as usize)
            .map_err(|e| e.for_entry(&header.filename))?
            .to_vec();

        let data = match header.compression {
            CompressionMethod::Stored => payload,
            _ => self
                .decompressor
                .inflate(payload)
                .await
                .map_err(|e| e.for_entry(&header.filename))?,
        };

        sleep(self.pause_after_decompress).await;

        let data = match &self.converter {
            Some(converter) => converter
                .to_utf8(data)
                .await
                .map_err(|e| e.for_entry(&header.filename))?,
            None => data,
        };

        let text = String::from_utf8(data)
            .map_err(|e| ZipError::from(e).for_entry(&header.filename))?;

        sleep(self.pause_after_decode).await;

        Ok(EntryOutcome::File(ExtractedEntry {
            name: header.filename.clone(),
            data: text,
            time: header.modified,
        }))
    }
}
