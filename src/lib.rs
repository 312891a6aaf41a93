//! # lexindex
//!
//! A word-position search engine with two interchangeable term indexes: an
//! inverted index backed by a hash map and a byte-keyed trie. Both answer the
//! same boolean queries and persist to the same versioned binary format, so
//! their behavior and speed can be compared directly.
//!
//! ## Features
//!
//! - Single-term, multi-term AND, quoted phrase, and exclusion queries
//! - Results ranked by term frequency, then document id
//! - Checksummed little-endian dump files with atomic replacement
//! - Numbered corpus indexing (`review_<n>.txt`)
//!
//! ```
//! use lexindex::engine::SearchEngine;
//!
//! let mut engine = SearchEngine::default();
//! engine.index_document("doc1", "the cat chased the dog");
//! engine.index_document("doc2", "a cat");
//!
//! assert_eq!(engine.search("cat - dog").document_ids(), vec!["doc2"]);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod lexical;
pub mod query;
pub mod storage;

pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::engine::SearchEngine;
    pub use crate::error::{LexIndexError, Result};
    pub use crate::lexical::{HashIndex, IndexKind, Posting, TermIndex, TrieIndex};
    pub use crate::query::{QueryEvaluator, SearchResults};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
