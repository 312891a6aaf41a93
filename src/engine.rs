//! The search engine: both indexes, the active-index selector, and the
//! document bookkeeping around them.

use std::fs;
use std::hint::black_box;
use std::path::Path;
use std::time::{Duration, Instant};

use ahash::AHashSet;
use log::{debug, info, warn};
use serde::Serialize;

use crate::analysis::{Token, WhitespaceTokenizer, normalize};
use crate::config::EngineConfig;
use crate::corpus::CorpusLayout;
use crate::error::Result;
use crate::lexical::hash_index::HashIndex;
use crate::lexical::index::{IndexKind, TermIndex};
use crate::lexical::trie_index::TrieIndex;
use crate::query::evaluator::{QueryEvaluator, SearchResults};
use crate::storage::file::{open_buffered, write_atomically};

/// Lookup timings for the same queries on both indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PerformanceReport {
    pub queries: usize,
    pub hash: Duration,
    pub trie: Duration,
}

impl PerformanceReport {
    /// The faster index, or `None` on a tie.
    pub fn faster(&self) -> Option<IndexKind> {
        match self.hash.cmp(&self.trie) {
            std::cmp::Ordering::Less => Some(IndexKind::Hash),
            std::cmp::Ordering::Greater => Some(IndexKind::Trie),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Summary of one index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub kind: IndexKind,
    pub terms: usize,
    pub documents: usize,
    pub postings: usize,
    /// Node count, for the trie only.
    pub nodes: Option<usize>,
}

/// Owns a hash index and a trie index. Inserts, queries, and dumps go to the
/// active one.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    config: EngineConfig,
    hash: HashIndex,
    trie: TrieIndex,
    hash_documents: AHashSet<String>,
    trie_documents: AHashSet<String>,
    tokenizer: WhitespaceTokenizer,
    evaluator: QueryEvaluator,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SearchEngine {
    pub fn new(config: EngineConfig) -> Self {
        SearchEngine {
            config,
            hash: HashIndex::new(),
            trie: TrieIndex::new(),
            hash_documents: AHashSet::new(),
            trie_documents: AHashSet::new(),
            tokenizer: WhitespaceTokenizer::new(),
            evaluator: QueryEvaluator::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn active_kind(&self) -> IndexKind {
        self.config.index_kind
    }

    /// Switch the index used by later operations.
    pub fn set_active(&mut self, kind: IndexKind) {
        self.config.index_kind = kind;
    }

    /// The active index.
    pub fn index(&self) -> &dyn TermIndex {
        self.index_of(self.active_kind())
    }

    pub fn index_of(&self, kind: IndexKind) -> &dyn TermIndex {
        match kind {
            IndexKind::Hash => &self.hash,
            IndexKind::Trie => &self.trie,
        }
    }

    fn active_parts(&mut self) -> (&mut dyn TermIndex, &mut AHashSet<String>) {
        match self.config.index_kind {
            IndexKind::Hash => (&mut self.hash, &mut self.hash_documents),
            IndexKind::Trie => (&mut self.trie, &mut self.trie_documents),
        }
    }

    /// Whether the active index already holds `document_id`.
    pub fn is_indexed(&self, document_id: &str) -> bool {
        match self.active_kind() {
            IndexKind::Hash => self.hash_documents.contains(document_id),
            IndexKind::Trie => self.trie_documents.contains(document_id),
        }
    }

    /// Tokenize `text` and insert every word into the active index.
    ///
    /// Returns `false` without touching the index when the document was
    /// already indexed, has an empty id, or contains no words. Only documents
    /// that leave postings behind are recorded, so the indexed set matches
    /// what a reloaded dump reports.
    pub fn index_document(&mut self, document_id: &str, text: &str) -> bool {
        if document_id.is_empty() {
            warn!("refusing to index a document with an empty id");
            return false;
        }
        if self.is_indexed(document_id) {
            warn!("document already indexed: {document_id}");
            return false;
        }

        let tokens: Vec<Token> = self.tokenizer.tokenize(text).collect();
        if tokens.is_empty() {
            warn!("no words in {document_id}, not indexed");
            return false;
        }

        let (index, documents) = self.active_parts();
        for token in &tokens {
            index.insert(&token.text, document_id, token.position);
        }
        documents.insert(document_id.to_string());
        debug!(
            "indexed {document_id}: {} words into {} index",
            tokens.len(),
            index.kind()
        );
        true
    }

    /// Index one file, using its path as the document id.
    pub fn index_file(&mut self, path: &Path) -> Result<bool> {
        let document_id = path.to_string_lossy().into_owned();
        if self.is_indexed(&document_id) {
            warn!("document already indexed: {document_id}");
            return Ok(false);
        }

        let bytes = fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(self.index_document(&document_id, &text))
    }

    /// Index the first `count` numbered documents found in `folder`.
    ///
    /// Returns how many documents were newly indexed.
    pub fn index_directory(&mut self, folder: &Path, count: usize) -> Result<usize> {
        let layout = CorpusLayout::new(
            self.config.document_prefix.clone(),
            self.config.document_extension.clone(),
        );

        let mut indexed = 0;
        for path in layout.list(folder, count)? {
            if self.index_file(&path)? {
                indexed += 1;
            }
        }

        info!(
            "indexed {indexed} files into {} index ({} terms)",
            self.active_kind(),
            self.index().term_count()
        );
        Ok(indexed)
    }

    /// Run a query against the active index.
    pub fn search(&self, query: &str) -> SearchResults {
        self.evaluator.search(self.index(), query)
    }

    /// Drop the active index's contents and its indexed-document set.
    pub fn clear(&mut self) {
        let (index, documents) = self.active_parts();
        index.clear();
        documents.clear();
        info!("cleared {} index", self.active_kind());
    }

    /// Save the active index to the configured dump path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&self.config.dump_path)
    }

    /// Save the active index to `path`, replacing the file atomically.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        write_atomically(path, |writer| self.index().save(writer))?;
        info!("dumped {} index to {}", self.active_kind(), path.display());
        Ok(())
    }

    /// Load the active index from the configured dump path.
    pub fn load(&mut self) -> Result<()> {
        let path = self.config.dump_path.clone();
        self.load_from(&path)
    }

    /// Replace the active index with the dump at `path`.
    ///
    /// The indexed-document set is rebuilt from the loaded postings. On error
    /// both the index and the set are unchanged.
    pub fn load_from(&mut self, path: &Path) -> Result<()> {
        let mut reader = open_buffered(path)?;
        let (index, documents) = self.active_parts();
        index.load(&mut reader)?;
        *documents = index.document_ids().into_iter().collect();

        info!(
            "loaded {} index from {}: {} documents",
            self.active_kind(),
            path.display(),
            self.indexed_count()
        );
        Ok(())
    }

    /// Number of documents in the active index.
    pub fn indexed_count(&self) -> usize {
        match self.active_kind() {
            IndexKind::Hash => self.hash_documents.len(),
            IndexKind::Trie => self.trie_documents.len(),
        }
    }

    /// Time single-term lookups of `queries` on both indexes.
    ///
    /// Each query is normalized and looked up as one term, whatever index is
    /// active.
    pub fn compare_performance(&self, queries: &[String]) -> PerformanceReport {
        let terms: Vec<String> = queries.iter().map(|q| normalize(q)).collect();

        let time = |index: &dyn TermIndex| {
            let start = Instant::now();
            for term in &terms {
                black_box(index.lookup(term));
            }
            start.elapsed()
        };

        let report = PerformanceReport {
            queries: terms.len(),
            hash: time(&self.hash),
            trie: time(&self.trie),
        };
        info!(
            "lookup timing over {} queries: hash {:?}, trie {:?}",
            report.queries, report.hash, report.trie
        );
        report
    }

    /// Statistics for the active index.
    pub fn stats(&self) -> IndexStats {
        let index = self.index();
        let postings: usize = index.entries().iter().map(|(_, p)| p.len()).sum();
        IndexStats {
            kind: index.kind(),
            terms: index.term_count(),
            documents: self.indexed_count(),
            postings,
            nodes: match self.active_kind() {
                IndexKind::Hash => None,
                IndexKind::Trie => Some(self.trie.node_count()),
            },
        }
    }
}
