//! The term index contract shared by the hash map and trie implementations.
//!
//! Both index types map a normalized term to the postings of the documents
//! that contain it. The query evaluator only talks to [`TermIndex`], so the
//! two can be swapped behind an [`IndexKind`] selector and compared directly.

use std::collections::BTreeSet;
use std::fmt;
use std::io::{Read, Write};

use ahash::{AHashMap, AHashSet};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{LexIndexError, Result};
use crate::lexical::hash_index::HashIndex;
use crate::lexical::posting::Posting;
use crate::lexical::trie_index::TrieIndex;

/// Which index implementation is active.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Inverted index backed by a hash map.
    #[default]
    Hash,
    /// Byte-keyed prefix tree.
    Trie,
}

impl IndexKind {
    /// All kinds, in file-tag order.
    pub const ALL: [IndexKind; 2] = [IndexKind::Hash, IndexKind::Trie];

    /// Tag byte used in the dump header.
    pub fn to_byte(self) -> u8 {
        match self {
            IndexKind::Hash => 0,
            IndexKind::Trie => 1,
        }
    }

    /// Parse a dump header tag byte.
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(IndexKind::Hash),
            1 => Ok(IndexKind::Trie),
            other => Err(LexIndexError::format(format!("unknown index kind tag {other}"))),
        }
    }

    /// Create an empty index of this kind.
    pub fn create(self) -> Box<dyn TermIndex> {
        match self {
            IndexKind::Hash => Box::new(HashIndex::new()),
            IndexKind::Trie => Box::new(TrieIndex::new()),
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Hash => write!(f, "hash"),
            IndexKind::Trie => write!(f, "trie"),
        }
    }
}

/// A mapping from normalized terms to posting lists.
///
/// Terms must already be normalized by the caller; implementations store and
/// compare them byte for byte.
pub trait TermIndex {
    /// Which implementation this is.
    fn kind(&self) -> IndexKind;

    /// Record that `term` occurs in `document_id` at `position`.
    ///
    /// A repeated (term, document) pair appends the position to the existing
    /// posting instead of creating a second one. Occurrences with an empty
    /// term or document id are skipped.
    fn insert(&mut self, term: &str, document_id: &str, position: i32);

    /// Postings for a single term, empty if the term is unknown.
    fn lookup(&self, term: &str) -> Vec<&Posting>;

    /// Postings of `term1` whose document also contains `term2`.
    fn lookup_two(&self, term1: &str, term2: &str) -> Vec<&Posting> {
        let other: AHashSet<&str> = self
            .lookup(term2)
            .into_iter()
            .map(|p| p.document_id.as_str())
            .collect();

        self.lookup(term1)
            .into_iter()
            .filter(|p| other.contains(p.document_id.as_str()))
            .collect()
    }

    /// Postings for documents that contain every one of `terms`.
    fn lookup_all(&self, terms: &[&str]) -> Vec<&Posting> {
        documents_containing_all(self, terms)
    }

    /// Postings of `term1` whose document does not contain `term2`.
    fn exclude(&self, term1: &str, term2: &str) -> Vec<&Posting> {
        let excluded: AHashSet<&str> = self
            .lookup(term2)
            .into_iter()
            .map(|p| p.document_id.as_str())
            .collect();

        self.lookup(term1)
            .into_iter()
            .filter(|p| !excluded.contains(p.document_id.as_str()))
            .collect()
    }

    /// Drop every posting.
    fn clear(&mut self);

    /// Number of distinct terms.
    fn term_count(&self) -> usize;

    /// Whether the index holds no terms.
    fn is_empty(&self) -> bool {
        self.term_count() == 0
    }

    /// Every term with its stored posting list, in ascending term order.
    fn entries(&self) -> Vec<(String, &[Posting])>;

    /// Distinct document identifiers referenced anywhere in the index.
    fn document_ids(&self) -> BTreeSet<String> {
        self.entries()
            .into_iter()
            .flat_map(|(_, postings)| postings.iter().map(|p| p.document_id.clone()))
            .collect()
    }

    /// Write the index in its binary dump format.
    fn save(&self, writer: &mut dyn Write) -> Result<()>;

    /// Replace the contents of the index with a dump.
    ///
    /// On error the index is left exactly as it was.
    fn load(&mut self, reader: &mut dyn Read) -> Result<()>;
}

/// Multi-term AND shared by both implementations.
///
/// A document qualifies when its count across the terms' posting lists equals
/// the number of terms. The result holds one posting per qualifying document,
/// taken from the first term, in the order the first term's lookup returns.
pub(crate) fn documents_containing_all<'a, I>(index: &'a I, terms: &[&str]) -> Vec<&'a Posting>
where
    I: TermIndex + ?Sized,
{
    let Some(first) = terms.first() else {
        return Vec::new();
    };

    let mut counts: AHashMap<&'a str, usize> = AHashMap::new();
    for term in terms {
        for posting in index.lookup(term) {
            *counts.entry(posting.document_id.as_str()).or_insert(0) += 1;
        }
    }

    index
        .lookup(first)
        .into_iter()
        .filter(|p| counts.get(p.document_id.as_str()) == Some(&terms.len()))
        .collect()
}
