//! Structured binary I/O for index persistence.
//!
//! Every value is fixed width and little-endian: counts and string lengths are
//! `u64`, positions are `i32`, flags are a single byte that must be 0 or 1.
//! Both ends keep a running CRC32 over the bytes they have seen so the file
//! footer can be produced and verified without a second pass.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use crc32fast::Hasher;

use crate::error::{LexIndexError, Result};

/// Upper bound on a single length-prefixed string.
///
/// Terms and document identifiers are short; anything larger than this is
/// treated as corruption instead of being allocated.
pub const MAX_STRING_LEN: u64 = 16 * 1024 * 1024;

/// Largest up-front allocation made for a list whose length came from the
/// stream. Longer lists still decode, they just grow as they go.
const MAX_PREALLOC: usize = 4096;

/// Capacity to reserve for a list of `len` items read from the stream.
pub fn capacity_hint(len: usize) -> usize {
    len.min(MAX_PREALLOC)
}

/// A structured writer for binary data.
pub struct StructWriter<W: Write> {
    writer: W,
    hasher: Hasher,
    position: u64,
}

impl<W: Write> StructWriter<W> {
    /// Create a new structured writer.
    pub fn new(writer: W) -> Self {
        StructWriter {
            writer,
            hasher: Hasher::new(),
            position: 0,
        }
    }

    /// Write a u8 value.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.writer.write_u8(value)?;
        self.update_checksum(&[value]);
        self.position += 1;
        Ok(())
    }

    /// Write a boolean as a single 0/1 byte.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    /// Write a u32 value (little-endian).
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.writer.write_u32::<LittleEndian>(value)?;
        self.update_checksum(&value.to_le_bytes());
        self.position += 4;
        Ok(())
    }

    /// Write an i32 value (little-endian).
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.writer.write_i32::<LittleEndian>(value)?;
        self.update_checksum(&value.to_le_bytes());
        self.position += 4;
        Ok(())
    }

    /// Write a u64 value (little-endian).
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.writer.write_u64::<LittleEndian>(value)?;
        self.update_checksum(&value.to_le_bytes());
        self.position += 8;
        Ok(())
    }

    /// Write a collection length as a u64.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        self.write_u64(len as u64)
    }

    /// Write a string with a u64 length prefix.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let bytes = value.as_bytes();
        self.write_len(bytes.len())?;
        self.write_raw(bytes)
    }

    /// Write raw bytes without length prefix.
    pub fn write_raw(&mut self, value: &[u8]) -> Result<()> {
        self.writer.write_all(value)?;
        self.update_checksum(value);
        self.position += value.len() as u64;
        Ok(())
    }

    /// Get current stream position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// CRC32 of everything written so far.
    pub fn checksum(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    fn update_checksum(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Append the checksum footer, flush, and hand back the inner writer.
    ///
    /// The footer itself is not covered by the checksum.
    pub fn finish(mut self) -> Result<W> {
        let checksum = self.checksum();
        self.writer.write_u32::<LittleEndian>(checksum)?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// A structured reader for binary data.
pub struct StructReader<R: Read> {
    reader: R,
    hasher: Hasher,
    position: u64,
}

impl<R: Read> StructReader<R> {
    /// Create a new structured reader.
    pub fn new(reader: R) -> Self {
        StructReader {
            reader,
            hasher: Hasher::new(),
            position: 0,
        }
    }

    /// Read a u8 value.
    pub fn read_u8(&mut self) -> Result<u8> {
        let value = self
            .reader
            .read_u8()
            .map_err(|e| LexIndexError::from_read(e, &self.describe("u8")))?;
        self.update_checksum(&[value]);
        self.position += 1;
        Ok(value)
    }

    /// Read a boolean stored as a single 0/1 byte.
    pub fn read_bool(&mut self) -> Result<bool> {
        let offset = self.position;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(LexIndexError::format(format!(
                "invalid boolean byte {other} at offset {offset}"
            ))),
        }
    }

    /// Read a u32 value (little-endian).
    pub fn read_u32(&mut self) -> Result<u32> {
        let value = self
            .reader
            .read_u32::<LittleEndian>()
            .map_err(|e| LexIndexError::from_read(e, &self.describe("u32")))?;
        self.update_checksum(&value.to_le_bytes());
        self.position += 4;
        Ok(value)
    }

    /// Read an i32 value (little-endian).
    pub fn read_i32(&mut self) -> Result<i32> {
        let value = self
            .reader
            .read_i32::<LittleEndian>()
            .map_err(|e| LexIndexError::from_read(e, &self.describe("i32")))?;
        self.update_checksum(&value.to_le_bytes());
        self.position += 4;
        Ok(value)
    }

    /// Read a u64 value (little-endian).
    pub fn read_u64(&mut self) -> Result<u64> {
        let value = self
            .reader
            .read_u64::<LittleEndian>()
            .map_err(|e| LexIndexError::from_read(e, &self.describe("u64")))?;
        self.update_checksum(&value.to_le_bytes());
        self.position += 8;
        Ok(value)
    }

    /// Read a u64 collection length and convert it to `usize`.
    pub fn read_len(&mut self) -> Result<usize> {
        let offset = self.position;
        let len = self.read_u64()?;
        usize::try_from(len).map_err(|_| {
            LexIndexError::format(format!("length {len} at offset {offset} does not fit in memory"))
        })
    }

    /// Read a string with a u64 length prefix.
    pub fn read_string(&mut self) -> Result<String> {
        let offset = self.position;
        let length = self.read_u64()?;
        if length > MAX_STRING_LEN {
            return Err(LexIndexError::format(format!(
                "implausible string length {length} at offset {offset}"
            )));
        }

        let mut bytes = Vec::with_capacity(capacity_hint(length as usize));
        let outcome = (&mut self.reader).take(length).read_to_end(&mut bytes);
        let read = outcome.map_err(|e| LexIndexError::from_read(e, &self.describe("string")))?;
        if (read as u64) < length {
            return Err(LexIndexError::format(format!(
                "truncated string at offset {offset}: expected {length} bytes, found {read}"
            )));
        }

        self.update_checksum(&bytes);
        self.position += length;

        String::from_utf8(bytes)
            .map_err(|e| LexIndexError::format(format!("invalid UTF-8 at offset {offset}: {e}")))
    }

    /// Get current stream position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// CRC32 of everything read so far.
    pub fn checksum(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    fn update_checksum(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    fn describe(&self, what: &str) -> String {
        format!("{what} at offset {}", self.position)
    }

    /// Read the checksum footer, compare it against the bytes consumed, and
    /// make sure nothing follows it.
    pub fn finish(mut self) -> Result<R> {
        let expected = self.checksum();
        let stored = self
            .reader
            .read_u32::<LittleEndian>()
            .map_err(|e| LexIndexError::from_read(e, "checksum footer"))?;
        if stored != expected {
            return Err(LexIndexError::format(format!(
                "checksum mismatch: stored {stored:#010x}, computed {expected:#010x}"
            )));
        }

        let mut trailing = [0u8; 1];
        if self.reader.read(&mut trailing)? != 0 {
            return Err(LexIndexError::format("unexpected data after checksum footer"));
        }

        Ok(self.reader)
    }
}
