//! Inverted index backed by a hash map from term to posting list.

use std::collections::BTreeSet;
use std::io::{Read, Write};

use ahash::{AHashMap, AHashSet};
use log::{debug, info};

use crate::error::{LexIndexError, Result};
use crate::lexical::index::{IndexKind, TermIndex};
use crate::lexical::posting::{self, Posting};
use crate::storage::format::FileHeader;
use crate::storage::structured::{StructReader, StructWriter, capacity_hint};

/// Term to postings map. Each posting list keeps insertion order.
#[derive(Debug, Clone, Default)]
pub struct HashIndex {
    terms: AHashMap<String, Vec<Posting>>,
}

impl HashIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        HashIndex {
            terms: AHashMap::new(),
        }
    }

    /// Total number of postings across all terms.
    pub fn posting_count(&self) -> usize {
        self.terms.values().map(Vec::len).sum()
    }

    fn sorted_entries(&self) -> Vec<(&String, &Vec<Posting>)> {
        let mut entries: Vec<_> = self.terms.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Write the body: entry count, then each term and its posting list in
    /// ascending term order.
    pub fn write_body<W: Write>(&self, writer: &mut StructWriter<W>) -> Result<()> {
        writer.write_len(self.terms.len())?;
        for (term, postings) in self.sorted_entries() {
            writer.write_string(term)?;
            posting::encode_list(postings, writer)?;
        }
        Ok(())
    }

    /// Read a body written by [`HashIndex::write_body`].
    pub fn read_body<R: Read>(reader: &mut StructReader<R>) -> Result<Self> {
        let count = reader.read_len()?;
        let mut terms = AHashMap::with_capacity(capacity_hint(count));

        for _ in 0..count {
            let term = reader.read_string()?;
            if term.is_empty() {
                return Err(LexIndexError::format(format!(
                    "empty term before offset {}",
                    reader.position()
                )));
            }

            let postings = posting::decode_list(reader)?;
            if terms.insert(term.clone(), postings).is_some() {
                return Err(LexIndexError::format(format!("duplicate term '{term}'")));
            }
        }

        Ok(HashIndex { terms })
    }
}

impl TermIndex for HashIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::Hash
    }

    fn insert(&mut self, term: &str, document_id: &str, position: i32) {
        if !posting::is_storable(term, document_id) {
            return;
        }
        match self.terms.get_mut(term) {
            Some(postings) => posting::merge_occurrence(postings, document_id, position),
            None => {
                self.terms
                    .insert(term.to_string(), vec![Posting::new(document_id, position)]);
            }
        }
    }

    fn lookup(&self, term: &str) -> Vec<&Posting> {
        let postings: Vec<&Posting> = self
            .terms
            .get(term)
            .map(|list| list.iter().collect())
            .unwrap_or_default();
        debug!("hash lookup '{term}': {} postings", postings.len());
        postings
    }

    fn clear(&mut self) {
        self.terms.clear();
    }

    fn term_count(&self) -> usize {
        self.terms.len()
    }

    fn entries(&self) -> Vec<(String, &[Posting])> {
        self.sorted_entries()
            .into_iter()
            .map(|(term, postings)| (term.clone(), postings.as_slice()))
            .collect()
    }

    fn document_ids(&self) -> BTreeSet<String> {
        let ids: AHashSet<&str> = self
            .terms
            .values()
            .flatten()
            .map(|p| p.document_id.as_str())
            .collect();
        ids.into_iter().map(str::to_string).collect()
    }

    fn save(&self, writer: &mut dyn Write) -> Result<()> {
        let mut writer = StructWriter::new(writer);
        FileHeader::current(IndexKind::Hash).write(&mut writer)?;
        self.write_body(&mut writer)?;
        let written = writer.position();
        writer.finish()?;

        info!(
            "saved hash index: {} terms, {} bytes",
            self.terms.len(),
            written + 4
        );
        Ok(())
    }

    fn load(&mut self, reader: &mut dyn Read) -> Result<()> {
        let mut reader = StructReader::new(reader);
        FileHeader::read_expecting(&mut reader, IndexKind::Hash)?;
        let staged = Self::read_body(&mut reader)?;
        reader.finish()?;

        info!("loaded hash index: {} terms", staged.terms.len());
        *self = staged;
        Ok(())
    }
}
