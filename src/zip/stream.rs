//! Sequential byte cursor over the decoded archive buffer.
//!
//! All parsing in this crate goes through one [`ZipStream`] per extraction
//! call. The pipeline repositions it explicitly when jumping between the
//! central directory and local file headers, so no two logical steps ever
//! touch it at the same time.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Result, ZipError};

/// A read cursor over an immutable byte buffer.
pub struct ZipStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ZipStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Current absolute position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the absolute position.
    ///
    /// No bounds check: offsets come from untrusted archive fields, and a
    /// bad seek surfaces as [`ZipError::OutOfRangeRead`] on the next read.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Read the next `size` bytes and advance.
    ///
    /// Hard-fails when fewer than `size` bytes remain; a short read here
    /// always means a corrupted or truncated archive.
    pub fn read(&mut self, size: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(size).filter(|&e| e <= self.data.len());
        match end {
            Some(end) => {
                let slice = &self.data[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => Err(ZipError::OutOfRangeRead {
                offset: self.pos,
                wanted: size,
                len: self.data.len(),
            }),
        }
    }

    /// Read a 2-byte unsigned little-endian integer.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read(2)?))
    }

    /// Read a 4-byte unsigned little-endian integer.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read(4)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_reads_advance() {
        let data = [1u8, 2, 3, 4, 5];
        let mut stream = ZipStream::new(&data);
        assert_eq!(stream.read(2).unwrap(), &[1, 2]);
        assert_eq!(stream.read(3).unwrap(), &[3, 4, 5]);
        assert_eq!(stream.position(), 5);
    }

    #[test]
    fn little_endian_fields() {
        let data = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut stream = ZipStream::new(&data);
        assert_eq!(stream.read_u16().unwrap(), 0x1234);
        assert_eq!(stream.read_u32().unwrap(), 0x12345678);
    }

    #[test]
    fn over_read_is_an_error() {
        let data = [0u8; 4];
        let mut stream = ZipStream::new(&data);
        stream.read(3).unwrap();
        let err = stream.read(2).unwrap_err();
        assert!(matches!(
            err,
            ZipError::OutOfRangeRead {
                offset: 3,
                wanted: 2,
                len: 4
            }
        ));
    }

    #[test]
    fn seek_past_end_fails_on_next_read() {
        let data = [0u8; 4];
        let mut stream = ZipStream::new(&data);
        stream.seek(100);
        assert!(stream.read(1).is_err());
    }
}
