//! Term indexes: postings, the shared [`index::TermIndex`] contract, and the
//! hash map and trie implementations.

pub mod hash_index;
pub mod index;
pub mod posting;
pub mod trie_index;

pub use hash_index::HashIndex;
pub use index::{IndexKind, TermIndex};
pub use posting::Posting;
pub use trie_index::TrieIndex;
