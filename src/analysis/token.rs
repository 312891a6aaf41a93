//! Token type produced by the tokenizer.

use serde::{Deserialize, Serialize};

/// A normalized word and its position among the kept words of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Normalized, non-empty text.
    pub text: String,
    /// Zero-based word position.
    pub position: i32,
}

impl Token {
    /// Create a new token.
    pub fn new<S: Into<String>>(text: S, position: i32) -> Self {
        Token {
            text: text.into(),
            position,
        }
    }
}
