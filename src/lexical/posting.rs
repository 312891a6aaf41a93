//! Postings: one document's occurrences of one term.

use std::io::{Read, Write};

use ahash::AHashSet;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{LexIndexError, Result};
use crate::storage::structured::{StructReader, StructWriter, capacity_hint};

/// A single posting: the positions at which a term occurs in one document.
///
/// Positions keep first-seen order; they are not sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Document identifier (path or name).
    pub document_id: String,
    /// Word positions of the term in the document.
    pub positions: Vec<i32>,
}

impl Posting {
    /// Create a posting for the first occurrence of a term in a document.
    pub fn new<S: Into<String>>(document_id: S, position: i32) -> Self {
        Posting {
            document_id: document_id.into(),
            positions: vec![position],
        }
    }

    /// Create a posting with positions.
    pub fn with_positions<S: Into<String>>(document_id: S, positions: Vec<i32>) -> Self {
        Posting {
            document_id: document_id.into(),
            positions,
        }
    }

    /// Add a position to this posting.
    pub fn add_position(&mut self, position: i32) {
        self.positions.push(position);
    }

    /// Number of occurrences in the document.
    pub fn frequency(&self) -> usize {
        self.positions.len()
    }

    /// Encode the posting.
    ///
    /// `[doc_id_len: u64][doc_id_bytes][position_count: u64][position: i32]*`
    pub fn encode<W: Write>(&self, writer: &mut StructWriter<W>) -> Result<()> {
        writer.write_string(&self.document_id)?;
        writer.write_len(self.positions.len())?;
        for &position in &self.positions {
            writer.write_i32(position)?;
        }
        Ok(())
    }

    /// Decode a posting.
    pub fn decode<R: Read>(reader: &mut StructReader<R>) -> Result<Self> {
        let document_id = reader.read_string()?;
        if document_id.is_empty() {
            return Err(LexIndexError::format(format!(
                "empty document identifier before offset {}",
                reader.position()
            )));
        }

        let count = reader.read_len()?;
        let mut positions = Vec::with_capacity(capacity_hint(count));
        for _ in 0..count {
            positions.push(reader.read_i32()?);
        }

        Ok(Posting {
            document_id,
            positions,
        })
    }
}

/// Append `position` to the posting for `document_id`, creating the posting
/// if the document is not in the list yet.
///
/// Linear in the list length; posting lists per term stay short relative to
/// the corpus.
pub fn merge_occurrence(postings: &mut Vec<Posting>, document_id: &str, position: i32) {
    match postings.iter_mut().find(|p| p.document_id == document_id) {
        Some(posting) => posting.add_position(position),
        None => postings.push(Posting::new(document_id, position)),
    }
}

/// Whether an occurrence can be stored: dumps require a non-empty term and
/// a non-empty document identifier.
pub fn is_storable(term: &str, document_id: &str) -> bool {
    if term.is_empty() {
        warn!("skipping empty term in {document_id:?}");
        return false;
    }
    if document_id.is_empty() {
        warn!("skipping '{term}' with an empty document identifier");
        return false;
    }
    true
}

/// Encode a posting list with its u64 count prefix.
pub fn encode_list<W: Write>(postings: &[Posting], writer: &mut StructWriter<W>) -> Result<()> {
    writer.write_len(postings.len())?;
    for posting in postings {
        posting.encode(writer)?;
    }
    Ok(())
}

/// Decode a posting list, rejecting duplicate documents.
pub fn decode_list<R: Read>(reader: &mut StructReader<R>) -> Result<Vec<Posting>> {
    let count = reader.read_len()?;
    let mut postings = Vec::with_capacity(capacity_hint(count));
    let mut seen = AHashSet::with_capacity(capacity_hint(count));
    for _ in 0..count {
        let posting = Posting::decode(reader)?;
        if !seen.insert(posting.document_id.clone()) {
            return Err(LexIndexError::format(format!(
                "duplicate posting for document '{}'",
                posting.document_id
            )));
        }
        postings.push(posting);
    }
    Ok(postings)
}

/// Stable sort by descending frequency; ties keep their current order.
pub fn sort_by_frequency(postings: &mut [&Posting]) {
    postings.sort_by(|a, b| b.frequency().cmp(&a.frequency()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_posting_creation() {
        let mut posting = Posting::new("doc1", 4);
        assert_eq!(posting.frequency(), 1);

        posting.add_position(1);
        posting.add_position(9);
        assert_eq!(posting.positions, vec![4, 1, 9]);
        assert_eq!(posting.frequency(), 3);
    }

    #[test]
    fn test_merge_occurrence() {
        let mut postings = Vec::new();
        merge_occurrence(&mut postings, "doc1", 0);
        merge_occurrence(&mut postings, "doc2", 3);
        merge_occurrence(&mut postings, "doc1", 7);

        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0], Posting::with_positions("doc1", vec![0, 7]));
        assert_eq!(postings[1], Posting::with_positions("doc2", vec![3]));
    }

    #[test]
    fn test_posting_encoding_layout() {
        let posting = Posting::with_positions("ab", vec![1, -2]);
        let mut writer = StructWriter::new(Vec::new());
        posting.encode(&mut writer).unwrap();
        assert_eq!(writer.position(), 8 + 2 + 8 + 4 * 2);
        let bytes = writer.finish().unwrap();

        let mut reader = StructReader::new(Cursor::new(bytes));
        assert_eq!(Posting::decode(&mut reader).unwrap(), posting);
        reader.finish().unwrap();
    }

    #[test]
    fn test_decode_list_rejects_duplicates() {
        let postings = vec![Posting::new("doc1", 0), Posting::new("doc1", 1)];
        let mut writer = StructWriter::new(Vec::new());
        encode_list(&postings, &mut writer).unwrap();
        let bytes = writer.finish().unwrap();

        let mut reader = StructReader::new(Cursor::new(bytes));
        let err = decode_list(&mut reader).unwrap_err();
        assert!(err.to_string().contains("duplicate posting"));
    }

    #[test]
    fn test_decode_rejects_empty_document_id() {
        let mut writer = StructWriter::new(Vec::new());
        Posting::with_positions("", vec![]).encode(&mut writer).unwrap();
        let bytes = writer.finish().unwrap();

        let mut reader = StructReader::new(Cursor::new(bytes));
        assert!(Posting::decode(&mut reader).unwrap_err().is_format());
    }

    #[test]
    fn test_sort_by_frequency_is_stable() {
        let a = Posting::with_positions("a", vec![1]);
        let b = Posting::with_positions("b", vec![1, 2, 3]);
        let c = Posting::with_positions("c", vec![5]);
        let mut refs = vec![&a, &b, &c];
        sort_by_frequency(&mut refs);

        let order: Vec<&str> = refs.iter().map(|p| p.document_id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }
}
