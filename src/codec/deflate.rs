use std::io::Read;

use async_trait::async_trait;
use flate2::read::DeflateDecoder;

use super::Decompressor;
use crate::error::{Result, ZipError};

/// Raw DEFLATE decompressor backed by flate2.
///
/// ZIP entries carry raw deflate streams with no zlib header, which is
/// exactly what [`DeflateDecoder`] consumes.
#[derive(Debug, Default)]
pub struct FlateDecompressor;

#[async_trait]
impl Decompressor for FlateDecompressor {
    async fn inflate(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let mut decoder = DeflateDecoder::new(data.as_slice());
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(ZipError::Decompress)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::DeflateEncoder;
    use std::io::Write;

    #[tokio::test]
    async fn inflates_a_raw_deflate_stream() {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"the quick brown fox").unwrap();
        let compressed = encoder.finish().unwrap();

        let out = FlateDecompressor.inflate(compressed).await.unwrap();
        assert_eq!(out, b"the quick brown fox");
    }

    #[tokio::test]
    async fn garbage_input_is_an_error() {
        let err = FlateDecompressor
            .inflate(vec![0xFF, 0x00, 0xAB])
            .await
            .unwrap_err();
        assert!(matches!(err, ZipError::Decompress(_)));
    }
}
