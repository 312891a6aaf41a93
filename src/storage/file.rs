//! File helpers for index dumps.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{LexIndexError, Result};

/// Buffer size for dump I/O.
pub const BUFFER_SIZE: usize = 65536;

/// Open a dump file for buffered reading.
pub fn open_buffered(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LexIndexError::invalid_argument(format!("dump file not found: {}", path.display()))
        } else {
            LexIndexError::Io(e)
        }
    })?;
    Ok(BufReader::with_capacity(BUFFER_SIZE, file))
}

/// Write a file through a sibling temporary file and rename it into place,
/// so an interrupted save never leaves a half-written dump behind.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let temp_path = temp_path_for(path);
    let outcome = (|| -> Result<()> {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::with_capacity(BUFFER_SIZE, file);
        write(&mut writer)?;
        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| LexIndexError::Io(e.into_error()))?
            .sync_all()?;
        fs::rename(&temp_path, path)?;
        Ok(())
    })();

    if outcome.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    outcome
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "dump".into());
    name.push(".tmp");
    path.with_file_name(name)
}
