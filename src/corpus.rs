//! Enumeration of numbered corpus files such as `review_1.txt`.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{LexIndexError, Result};

/// Naming scheme for numbered documents: `<prefix><n>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusLayout {
    pub prefix: String,
    pub extension: String,
}

impl Default for CorpusLayout {
    fn default() -> Self {
        CorpusLayout {
            prefix: "review_".to_string(),
            extension: "txt".to_string(),
        }
    }
}

impl CorpusLayout {
    pub fn new<S: Into<String>>(prefix: S, extension: S) -> Self {
        CorpusLayout {
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    /// The document number encoded in `file_name`, if it follows the layout.
    pub fn document_number(&self, file_name: &str) -> Option<u64> {
        let stem = file_name
            .strip_prefix(&self.prefix)?
            .strip_suffix(&self.extension)?
            .strip_suffix('.')?;
        if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        stem.parse().ok()
    }

    /// Up to `limit` documents from `folder`, ordered by document number.
    ///
    /// Numbers may have gaps. Fewer matches than `limit` is not an error; it
    /// is logged and the available documents are returned.
    pub fn list(&self, folder: &Path, limit: usize) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(folder).map_err(|e| {
            LexIndexError::invalid_argument(format!(
                "cannot read corpus folder {}: {e}",
                folder.display()
            ))
        })?;

        let mut numbered = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(number) = name.to_str().and_then(|n| self.document_number(n)) else {
                continue;
            };
            numbered.push((number, entry.path()));
        }

        numbered.sort();
        if numbered.len() < limit {
            warn!(
                "requested {limit} documents but only {} {}<n>.{} files exist in {}",
                numbered.len(),
                self.prefix,
                self.extension,
                folder.display()
            );
        }

        let paths: Vec<PathBuf> = numbered
            .into_iter()
            .take(limit)
            .map(|(_, path)| path)
            .collect();
        debug!("corpus listing: {} documents from {}", paths.len(), folder.display());
        Ok(paths)
    }
}
