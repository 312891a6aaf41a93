//! Whitespace tokenizer.

use crate::analysis::normalizer::normalize;
use crate::analysis::token::Token;

/// Splits text on whitespace and normalizes each word.
///
/// Words that normalize to nothing are dropped and do not consume a position,
/// so positions count kept words only.
#[derive(Clone, Debug, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    /// Create a new whitespace tokenizer.
    pub fn new() -> Self {
        WhitespaceTokenizer
    }

    /// Tokenize `text` into normalized words with their positions.
    pub fn tokenize<'a>(&self, text: &'a str) -> impl Iterator<Item = Token> + 'a {
        text.split_whitespace()
            .map(normalize)
            .filter(|word| !word.is_empty())
            .zip(0..)
            .map(|(word, position)| Token::new(word, position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_tokenizer() {
        let tokenizer = WhitespaceTokenizer::new();
        let tokens: Vec<Token> = tokenizer.tokenize("The cat, the DOG!").collect();

        assert_eq!(
            tokens,
            vec![
                Token::new("the", 0),
                Token::new("cat", 1),
                Token::new("the", 2),
                Token::new("dog", 3),
            ]
        );
    }

    #[test]
    fn test_positions_skip_discarded_words() {
        let tokenizer = WhitespaceTokenizer::new();
        let tokens: Vec<Token> = tokenizer.tokenize("cat -- ... dog\n\tbird").collect();

        let positions: Vec<(String, i32)> =
            tokens.into_iter().map(|t| (t.text, t.position)).collect();
        assert_eq!(
            positions,
            vec![
                ("cat".to_string(), 0),
                ("dog".to_string(), 1),
                ("bird".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(WhitespaceTokenizer::new().tokenize("   \n").count(), 0);
    }
}
