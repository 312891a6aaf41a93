//! Versioned file header shared by both index kinds.
//!
//! Layout:
//!
//! ```text
//! [magic: "LXIX"][format_version: u32][index_kind: u8] body... [crc32: u32]
//! ```
//!
//! The checksum footer covers the header and the body; it is produced by
//! [`StructWriter::finish`] and checked by [`StructReader::finish`].

use std::io::{Read, Write};

use crate::error::{LexIndexError, Result};
use crate::lexical::index::IndexKind;
use crate::storage::structured::{StructReader, StructWriter};

/// Magic bytes: "LXIX" in ASCII.
pub const MAGIC: [u8; 4] = *b"LXIX";

/// Current format version.
pub const FORMAT_VERSION: u32 = 1;

/// Parsed file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u32,
    pub kind: IndexKind,
}

impl FileHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 4 + 4 + 1;

    /// Header for a file written by this version of the library.
    pub fn current(kind: IndexKind) -> Self {
        FileHeader {
            version: FORMAT_VERSION,
            kind,
        }
    }

    pub fn write<W: Write>(&self, writer: &mut StructWriter<W>) -> Result<()> {
        writer.write_raw(&MAGIC)?;
        writer.write_u32(self.version)?;
        writer.write_u8(self.kind.to_byte())
    }

    /// Read and validate a header, requiring it to describe `expected`.
    pub fn read_expecting<R: Read>(reader: &mut StructReader<R>, expected: IndexKind) -> Result<Self> {
        let mut magic = [0u8; 4];
        for byte in magic.iter_mut() {
            *byte = reader.read_u8()?;
        }
        if magic != MAGIC {
            return Err(LexIndexError::format(format!(
                "invalid magic number {magic:02x?}, not a lexindex dump"
            )));
        }

        let version = reader.read_u32()?;
        if version != FORMAT_VERSION {
            return Err(LexIndexError::format(format!(
                "unsupported format version: {version} (expected {FORMAT_VERSION})"
            )));
        }

        let kind = IndexKind::from_byte(reader.read_u8()?)?;
        if kind != expected {
            return Err(LexIndexError::format(format!(
                "dump holds a {kind} index, cannot load it into a {expected} index"
            )));
        }

        Ok(FileHeader { version, kind })
    }
}
