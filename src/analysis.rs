//! Text analysis: word normalization and whitespace tokenization.

pub mod normalizer;
pub mod token;
pub mod tokenizer;

pub use normalizer::normalize;
pub use token::Token;
pub use tokenizer::WhitespaceTokenizer;
