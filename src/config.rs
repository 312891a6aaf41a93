//! Engine configuration.
//!
//! Defaults match the conventional corpus layout (`review_<n>.txt` files) and
//! dump location. A JSON file can override any subset of the fields:
//!
//! ```json
//! { "index_kind": "trie", "dump_path": "reviews.dat", "default_limit": 20 }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LexIndexError, Result};
use crate::lexical::index::IndexKind;

/// Default dump file name.
pub const DEFAULT_DUMP_PATH: &str = "search_engine.dat";

/// Configuration for a [`SearchEngine`](crate::engine::SearchEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Index used for inserts, queries, and dumps.
    pub index_kind: IndexKind,
    /// Where dumps are written and read.
    pub dump_path: PathBuf,
    /// File name prefix of corpus documents.
    pub document_prefix: String,
    /// File extension of corpus documents, without the dot.
    pub document_extension: String,
    /// Number of hits shown per query.
    pub default_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            index_kind: IndexKind::Hash,
            dump_path: PathBuf::from(DEFAULT_DUMP_PATH),
            document_prefix: "review_".to_string(),
            document_extension: "txt".to_string(),
            default_limit: 10,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            LexIndexError::config(format!("cannot open {}: {e}", path.display()))
        })?;
        let config: EngineConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Check field values.
    pub fn validate(&self) -> Result<()> {
        if self.document_prefix.is_empty() {
            return Err(LexIndexError::config("document_prefix must not be empty"));
        }
        if self.document_extension.starts_with('.') {
            return Err(LexIndexError::config(
                "document_extension must not start with '.'",
            ));
        }
        if self.default_limit == 0 {
            return Err(LexIndexError::config("default_limit must be at least 1"));
        }
        Ok(())
    }

    pub fn with_index_kind(mut self, kind: IndexKind) -> Self {
        self.index_kind = kind;
        self
    }

    pub fn with_dump_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.dump_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.index_kind, IndexKind::Hash);
        assert_eq!(config.dump_path, PathBuf::from("search_engine.dat"));
        assert_eq!(config.document_prefix, "review_");
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lexindex.json");
        fs::write(&path, r#"{ "index_kind": "trie", "default_limit": 3 }"#).unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.index_kind, IndexKind::Trie);
        assert_eq!(config.default_limit, 3);
        assert_eq!(config.document_extension, "txt");
    }

    #[test]
    fn test_invalid_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");

        fs::write(&path, r#"{ "index_kind": "btree" }"#).unwrap();
        assert!(matches!(
            EngineConfig::from_file(&path).unwrap_err(),
            LexIndexError::Json(_)
        ));

        fs::write(&path, r#"{ "default_limit": 0 }"#).unwrap();
        assert!(matches!(
            EngineConfig::from_file(&path).unwrap_err(),
            LexIndexError::Config(_)
        ));

        let missing = EngineConfig::from_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, LexIndexError::Config(_)));
    }
}
