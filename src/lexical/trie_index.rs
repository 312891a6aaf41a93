//! Byte-keyed prefix tree holding posting lists at terminal nodes.
//!
//! Nodes live in a flat arena and refer to each other by [`NodeId`]; the root
//! is always `NodeId(0)`. Descent consumes one byte of the term per level, so
//! a multi-byte UTF-8 character spans several levels.
//!
//! Persistence walks the tree depth-first in pre-order. Each node record is
//!
//! ```text
//! [byte: u8][terminal: bool][postings]{ [has_child: bool][child record]? } x 256
//! ```
//!
//! with children announced in increasing byte order. Both directions use an
//! explicit stack, so long terms cannot exhaust the call stack.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use log::{debug, info};

use crate::error::{LexIndexError, Result};
use crate::lexical::index::{IndexKind, TermIndex, documents_containing_all};
use crate::lexical::posting::{self, Posting, sort_by_frequency};
use crate::storage::format::FileHeader;
use crate::storage::structured::{StructReader, StructWriter};

/// Number of child slots announced per node in the dump.
const CHILD_SLOTS: usize = 256;

/// Index of a node in the trie arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// A trie node.
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    byte: u8,
    terminal: bool,
    postings: Vec<Posting>,
    children: BTreeMap<u8, NodeId>,
}

impl TrieNode {
    fn new(byte: u8) -> Self {
        TrieNode {
            byte,
            ..Default::default()
        }
    }

    /// The byte on the edge leading to this node (0 for the root).
    pub fn byte(&self) -> u8 {
        self.byte
    }

    /// Whether the path to this node spells a stored term.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Stored postings, in insertion order.
    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    /// Child edges in byte order.
    pub fn children(&self) -> impl Iterator<Item = (u8, NodeId)> + '_ {
        self.children.iter().map(|(&byte, &id)| (byte, id))
    }

    fn write_record<W: Write>(&self, writer: &mut StructWriter<W>) -> Result<()> {
        writer.write_u8(self.byte)?;
        writer.write_bool(self.terminal)?;
        posting::encode_list(&self.postings, writer)
    }

    fn read_record<R: Read>(reader: &mut StructReader<R>, expected_byte: u8) -> Result<Self> {
        let offset = reader.position();
        let byte = reader.read_u8()?;
        if byte != expected_byte {
            return Err(LexIndexError::format(format!(
                "trie node at offset {offset} has byte {byte}, expected {expected_byte}"
            )));
        }

        let terminal = reader.read_bool()?;
        let postings = posting::decode_list(reader)?;
        if !terminal && !postings.is_empty() {
            return Err(LexIndexError::format(format!(
                "non-terminal trie node at offset {offset} carries {} postings",
                postings.len()
            )));
        }

        Ok(TrieNode {
            byte,
            terminal,
            postings,
            children: BTreeMap::new(),
        })
    }
}

/// Prefix tree index.
#[derive(Debug, Clone)]
pub struct TrieIndex {
    nodes: Vec<TrieNode>,
    terms: usize,
}

impl Default for TrieIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl TrieIndex {
    /// Create a trie holding only an empty root.
    pub fn new() -> Self {
        TrieIndex {
            nodes: vec![TrieNode::new(0)],
            terms: 0,
        }
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The node with the given id.
    pub fn node(&self, id: NodeId) -> Option<&TrieNode> {
        self.nodes.get(id.0)
    }

    /// Follow `term` byte by byte from the root.
    pub fn find(&self, term: &str) -> Option<NodeId> {
        let mut current = NodeId::ROOT;
        for byte in term.bytes() {
            current = *self.nodes[current.0].children.get(&byte)?;
        }
        Some(current)
    }

    fn child_or_insert(&mut self, parent: NodeId, byte: u8) -> NodeId {
        let existing = self.nodes[parent.0].children.get(&byte).copied();
        match existing {
            Some(child) => child,
            None => {
                let child = NodeId(self.nodes.len());
                self.nodes.push(TrieNode::new(byte));
                self.nodes[parent.0].children.insert(byte, child);
                child
            }
        }
    }

    /// Write the pre-order node stream.
    pub fn write_body<W: Write>(&self, writer: &mut StructWriter<W>) -> Result<()> {
        self.nodes[NodeId::ROOT.0].write_record(writer)?;
        let mut stack: Vec<(NodeId, usize)> = vec![(NodeId::ROOT, 0)];

        while let Some(frame) = stack.last_mut() {
            let (id, slot) = *frame;
            if slot == CHILD_SLOTS {
                stack.pop();
                continue;
            }
            frame.1 += 1;

            match self.nodes[id.0].children.get(&(slot as u8)) {
                Some(&child) => {
                    writer.write_bool(true)?;
                    self.nodes[child.0].write_record(writer)?;
                    stack.push((child, 0));
                }
                None => writer.write_bool(false)?,
            }
        }
        Ok(())
    }

    /// Rebuild a trie from a pre-order node stream.
    pub fn read_body<R: Read>(reader: &mut StructReader<R>) -> Result<Self> {
        let root = TrieNode::read_record(reader, 0)?;
        if root.terminal {
            return Err(LexIndexError::format(format!(
                "empty term at trie root before offset {}",
                reader.position()
            )));
        }
        let mut terms = 0;
        let mut nodes = vec![root];
        let mut path: Vec<u8> = Vec::new();
        let mut stack: Vec<(NodeId, usize)> = vec![(NodeId::ROOT, 0)];

        while let Some(frame) = stack.last_mut() {
            let (parent, slot) = *frame;
            if slot == CHILD_SLOTS {
                stack.pop();
                path.pop();
                continue;
            }
            frame.1 += 1;

            if !reader.read_bool()? {
                continue;
            }

            let byte = slot as u8;
            let node = TrieNode::read_record(reader, byte)?;
            path.push(byte);
            if node.terminal {
                if std::str::from_utf8(&path).is_err() {
                    return Err(LexIndexError::format(format!(
                        "trie term {path:02x?} is not valid UTF-8"
                    )));
                }
                terms += 1;
            }

            let id = NodeId(nodes.len());
            nodes.push(node);
            nodes[parent.0].children.insert(byte, id);
            stack.push((id, 0));
        }

        Ok(TrieIndex { nodes, terms })
    }
}

impl TermIndex for TrieIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::Trie
    }

    fn insert(&mut self, term: &str, document_id: &str, position: i32) {
        if !posting::is_storable(term, document_id) {
            return;
        }
        let mut current = NodeId::ROOT;
        for byte in term.bytes() {
            current = self.child_or_insert(current, byte);
        }

        let node = &mut self.nodes[current.0];
        if !node.terminal {
            node.terminal = true;
            self.terms += 1;
        }
        posting::merge_occurrence(&mut node.postings, document_id, position);
    }

    /// Postings sorted by descending frequency; ties keep insertion order.
    fn lookup(&self, term: &str) -> Vec<&Posting> {
        let mut postings: Vec<&Posting> = match self.find(term).map(|id| &self.nodes[id.0]) {
            Some(node) if node.terminal => node.postings.iter().collect(),
            _ => Vec::new(),
        };
        sort_by_frequency(&mut postings);
        debug!("trie lookup '{term}': {} postings", postings.len());
        postings
    }

    fn lookup_all(&self, terms: &[&str]) -> Vec<&Posting> {
        let mut postings = documents_containing_all(self, terms);
        sort_by_frequency(&mut postings);
        postings
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(TrieNode::new(0));
        self.terms = 0;
    }

    fn term_count(&self) -> usize {
        self.terms
    }

    fn entries(&self) -> Vec<(String, &[Posting])> {
        let mut entries = Vec::with_capacity(self.terms);
        let mut stack: Vec<(NodeId, Vec<u8>)> = vec![(NodeId::ROOT, Vec::new())];

        while let Some((id, path)) = stack.pop() {
            let node = &self.nodes[id.0];
            if node.terminal {
                entries.push((
                    String::from_utf8_lossy(&path).into_owned(),
                    node.postings.as_slice(),
                ));
            }
            // reversed so the smallest byte is visited first
            for (&byte, &child) in node.children.iter().rev() {
                let mut child_path = path.clone();
                child_path.push(byte);
                stack.push((child, child_path));
            }
        }
        entries
    }

    fn save(&self, writer: &mut dyn Write) -> Result<()> {
        let mut writer = StructWriter::new(writer);
        FileHeader::current(IndexKind::Trie).write(&mut writer)?;
        self.write_body(&mut writer)?;
        let written = writer.position();
        writer.finish()?;

        info!(
            "saved trie index: {} terms, {} nodes, {} bytes",
            self.terms,
            self.nodes.len(),
            written + 4
        );
        Ok(())
    }

    fn load(&mut self, reader: &mut dyn Read) -> Result<()> {
        let mut reader = StructReader::new(reader);
        FileHeader::read_expecting(&mut reader, IndexKind::Trie)?;
        let staged = Self::read_body(&mut reader)?;
        reader.finish()?;

        info!(
            "loaded trie index: {} terms, {} nodes",
            staged.terms,
            staged.nodes.len()
        );
        *self = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::hash_index::HashIndex;
    use std::io::Cursor;

    fn sample() -> TrieIndex {
        let mut trie = TrieIndex::new();
        trie.insert("cat", "doc1", 0);
        trie.insert("dog", "doc1", 1);
        trie.insert("cat", "doc2", 0);
        trie
    }

    fn saved(trie: &TrieIndex) -> Vec<u8> {
        let mut bytes = Vec::new();
        trie.save(&mut bytes).unwrap();
        bytes
    }

    fn ids(postings: &[&Posting]) -> Vec<String> {
        postings.iter().map(|p| p.document_id.clone()).collect()
    }

    #[test]
    fn test_insert_and_lookup() {
        let trie = sample();
        assert_eq!(ids(&trie.lookup("cat")), vec!["doc1", "doc2"]);
        assert_eq!(trie.lookup("dog")[0], &Posting::new("doc1", 1));
        assert!(trie.lookup("ca").is_empty());
        assert!(trie.lookup("cats").is_empty());
        assert!(!trie.node(trie.find("ca").unwrap()).unwrap().is_terminal());
        let cat = trie.node(trie.find("cat").unwrap()).unwrap();
        assert_eq!(cat.postings().len(), 2);
        assert_eq!(cat.byte(), b't');
        assert_eq!(trie.term_count(), 2);
        // root + c-a-t + d-o-g
        assert_eq!(trie.node_count(), 7);
    }

    #[test]
    fn test_lookup_sorts_by_frequency_without_reordering_storage() {
        let mut trie = TrieIndex::new();
        trie.insert("cat", "doc1", 0);
        trie.insert("cat", "doc2", 0);
        trie.insert("cat", "doc2", 4);
        trie.insert("cat", "doc3", 1);

        assert_eq!(ids(&trie.lookup("cat")), vec!["doc2", "doc1", "doc3"]);

        let entries = trie.entries();
        let stored: Vec<&str> = entries[0].1.iter().map(|p| p.document_id.as_str()).collect();
        assert_eq!(stored, vec!["doc1", "doc2", "doc3"]);
    }

    #[test]
    fn test_lookup_all_sorts_by_frequency() {
        let mut trie = TrieIndex::new();
        trie.insert("cat", "doc1", 0);
        trie.insert("dog", "doc1", 1);
        trie.insert("cat", "doc2", 0);
        trie.insert("cat", "doc2", 2);
        trie.insert("dog", "doc2", 1);

        assert_eq!(ids(&trie.lookup_all(&["cat", "dog"])), vec!["doc2", "doc1"]);
    }

    #[test]
    fn test_multibyte_terms_share_prefixes() {
        let mut trie = TrieIndex::new();
        trie.insert("cafe", "doc1", 0);
        trie.insert("café", "doc2", 0);

        assert_eq!(ids(&trie.lookup("café")), vec!["doc2"]);
        assert_eq!(ids(&trie.lookup("cafe")), vec!["doc1"]);
        // "é" is two bytes below the shared "caf" prefix
        assert_eq!(trie.node_count(), 1 + 3 + 1 + 2);

        let terms: Vec<String> = trie.entries().into_iter().map(|(t, _)| t).collect();
        assert_eq!(terms, vec!["cafe", "café"]);
    }

    #[test]
    fn test_entries_match_hash_index() {
        let mut trie = TrieIndex::new();
        let mut hash = HashIndex::new();
        for (term, doc, pos) in [("zebra", "d1", 0), ("apple", "d2", 3), ("app", "d1", 1), ("apple", "d1", 2)] {
            trie.insert(term, doc, pos);
            hash.insert(term, doc, pos);
        }
        assert_eq!(trie.entries(), hash.entries());
        assert_eq!(trie.document_ids(), hash.document_ids());
    }

    #[test]
    fn test_clear_keeps_root() {
        let mut trie = sample();
        trie.clear();
        assert_eq!(trie.node_count(), 1);
        let root = trie.node(NodeId::ROOT).unwrap();
        assert_eq!(root.byte(), 0);
        assert!(!root.is_terminal());
        assert_eq!(root.children().count(), 0);
        assert!(trie.is_empty());
        assert!(trie.lookup("cat").is_empty());

        trie.insert("cat", "doc3", 2);
        assert_eq!(ids(&trie.lookup("cat")), vec!["doc3"]);
    }

    #[test]
    fn test_save_load_round_trip() {
        let trie = sample();
        let bytes = saved(&trie);

        let mut loaded = TrieIndex::new();
        loaded.load(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(loaded.entries(), trie.entries());
        assert_eq!(loaded.node_count(), trie.node_count());
        assert_eq!(loaded.term_count(), 2);
    }

    #[test]
    fn test_deep_trie_round_trip() {
        let mut trie = TrieIndex::new();
        let long_term = "a".repeat(20_000);
        trie.insert(&long_term, "doc1", 0);

        let mut loaded = TrieIndex::new();
        loaded.load(&mut Cursor::new(saved(&trie))).unwrap();
        assert_eq!(loaded.lookup(&long_term).len(), 1);
    }

    #[test]
    fn test_failed_load_keeps_previous_contents() {
        let mut bytes = saved(&sample());
        let middle = bytes.len() / 2;
        bytes.truncate(middle);

        let mut target = TrieIndex::new();
        target.insert("owl", "doc7", 2);
        assert!(target.load(&mut Cursor::new(bytes)).is_err());
        assert_eq!(ids(&target.lookup("owl")), vec!["doc7"]);
        assert!(target.lookup("cat").is_empty());
    }

    #[test]
    fn test_load_rejects_hash_dump() {
        let mut hash = HashIndex::new();
        hash.insert("cat", "doc1", 0);
        let mut bytes = Vec::new();
        hash.save(&mut bytes).unwrap();

        let err = TrieIndex::new().load(&mut Cursor::new(bytes)).unwrap_err();
        assert!(err.is_format());
    }

    fn root_record(writer: &mut StructWriter<Vec<u8>>, postings: &[Posting], terminal: bool) {
        FileHeader::current(IndexKind::Trie).write(writer).unwrap();
        writer.write_u8(0).unwrap();
        writer.write_bool(terminal).unwrap();
        posting::encode_list(postings, writer).unwrap();
    }

    #[test]
    fn test_load_rejects_child_byte_mismatch() {
        let mut writer = StructWriter::new(Vec::new());
        root_record(&mut writer, &[], false);
        for slot in 0..CHILD_SLOTS {
            if slot == usize::from(b'a') {
                writer.write_bool(true).unwrap();
                writer.write_u8(b'b').unwrap();
                break;
            }
            writer.write_bool(false).unwrap();
        }
        let bytes = writer.finish().unwrap();

        let err = TrieIndex::new().load(&mut Cursor::new(bytes)).unwrap_err();
        assert!(err.to_string().contains("expected 97"));
    }

    #[test]
    fn test_load_rejects_postings_on_non_terminal() {
        let mut writer = StructWriter::new(Vec::new());
        root_record(&mut writer, &[Posting::new("doc1", 0)], false);
        let bytes = writer.finish().unwrap();

        let err = TrieIndex::new().load(&mut Cursor::new(bytes)).unwrap_err();
        assert!(err.to_string().contains("non-terminal"));
    }

    #[test]
    fn test_load_rejects_terminal_root() {
        let mut writer = StructWriter::new(Vec::new());
        root_record(&mut writer, &[Posting::new("doc1", 0)], true);
        for _ in 0..CHILD_SLOTS {
            writer.write_bool(false).unwrap();
        }
        let bytes = writer.finish().unwrap();

        let err = TrieIndex::new().load(&mut Cursor::new(bytes)).unwrap_err();
        assert!(err.to_string().contains("empty term"));
    }
}
