//! Query parser for the four supported query forms.
//!
//! Forms are tried in this order:
//!
//! - Quoted phrase: `"w1 w2 ..."` matches documents containing every word.
//!   Word adjacency is not checked.
//! - Plus form: `w1 w2 + w3`. Words before the first lone `+` are included,
//!   words after it are excluded.
//! - Minus form: `w1 - w2` matches documents containing `w1` but not `w2`.
//! - Plain words: one word is a single-term lookup, several are an AND.
//!
//! Every word is normalized the same way indexed words are.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::analysis::normalize;
use crate::error::{LexIndexError, Result};

/// A query reduced to one of the index operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsedQuery {
    /// Nothing to search for.
    Empty,
    /// Single-term lookup.
    Single(String),
    /// Documents containing every term.
    All(Vec<String>),
    /// Documents containing `include` but not `exclude`.
    Exclude { include: String, exclude: String },
}

impl ParsedQuery {
    fn from_words(words: Vec<String>) -> Self {
        match words.len() {
            0 => ParsedQuery::Empty,
            _ => ParsedQuery::All(words),
        }
    }
}

/// Parses free-text queries into [`ParsedQuery`] values.
#[derive(Debug, Clone, Default)]
pub struct QueryParser;

impl QueryParser {
    /// Create a new query parser.
    pub fn new() -> Self {
        QueryParser
    }

    /// Parse a query string.
    pub fn parse(&self, query_str: &str) -> Result<ParsedQuery> {
        let trimmed = query_str.trim();
        if trimmed.is_empty() {
            return Ok(ParsedQuery::Empty);
        }

        if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
            let phrase = &trimmed[1..trimmed.len() - 1];
            return Ok(ParsedQuery::from_words(normalize_words(phrase.split_whitespace())));
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();

        if trimmed.contains('+') {
            return self.parse_plus(&tokens);
        }

        if tokens.iter().any(|t| t.starts_with('-')) {
            return self.parse_minus(&tokens);
        }

        let mut words = normalize_words(tokens.iter().copied());
        if words.len() == 1 {
            return Ok(ParsedQuery::Single(words.remove(0)));
        }
        Ok(ParsedQuery::from_words(words))
    }

    fn parse_plus(&self, tokens: &[&str]) -> Result<ParsedQuery> {
        let (included, excluded) = match tokens.iter().position(|t| *t == "+") {
            Some(split) => (&tokens[..split], &tokens[split + 1..]),
            None => (tokens, &tokens[tokens.len()..]),
        };
        let included = normalize_words(included.iter().copied());
        let excluded = normalize_words(excluded.iter().copied().filter(|t| *t != "+"));

        if excluded.is_empty() {
            return Ok(ParsedQuery::from_words(included));
        }

        let Some(include) = included.first() else {
            return Err(LexIndexError::query(format!(
                "exclusion of '{}' needs at least one included word before '+'",
                excluded.join(" ")
            )));
        };

        if included.len() > 1 || excluded.len() > 1 {
            let ignored: Vec<&str> = included[1..]
                .iter()
                .chain(&excluded[1..])
                .map(String::as_str)
                .collect();
            warn!(
                "only one included and one excluded word are supported, ignoring: {}",
                ignored.join(" ")
            );
        }

        Ok(ParsedQuery::Exclude {
            include: include.clone(),
            exclude: excluded[0].clone(),
        })
    }

    fn parse_minus(&self, tokens: &[&str]) -> Result<ParsedQuery> {
        match tokens {
            [include, "-", exclude] => Ok(ParsedQuery::Exclude {
                include: normalize(include),
                exclude: normalize(exclude),
            }),
            _ => Err(LexIndexError::query(format!(
                "unsupported exclusion query '{}': expected 'word1 - word2'",
                tokens.join(" ")
            ))),
        }
    }
}

fn normalize_words<'a, I>(words: I) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    words
        .map(normalize)
        .filter(|word| !word.is_empty())
        .collect()
}
