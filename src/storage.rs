//! Binary persistence for index dumps.
//!
//! - [`structured`]: fixed-width little-endian reader and writer with a
//!   running CRC32.
//! - [`format`]: the versioned file header.
//! - [`file`]: buffered file access and atomic replacement of dump files.

pub mod file;
pub mod format;
pub mod structured;
