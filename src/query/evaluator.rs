//! Runs parsed queries against a [`TermIndex`] and ranks the results.

use std::cmp::Ordering;

use log::{debug, warn};
use serde::Serialize;

use crate::lexical::index::TermIndex;
use crate::lexical::posting::Posting;
use crate::query::parser::{ParsedQuery, QueryParser};

/// A matching document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub document_id: String,
    pub frequency: usize,
    pub positions: Vec<i32>,
}

impl From<&Posting> for Hit {
    fn from(posting: &Posting) -> Self {
        Hit {
            document_id: posting.document_id.clone(),
            frequency: posting.frequency(),
            positions: posting.positions.clone(),
        }
    }
}

/// Ranked hits for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    /// Hits ordered by frequency (descending), then document id (ascending).
    pub hits: Vec<Hit>,
    /// Why the query was not run, if it was rejected.
    pub rejection: Option<String>,
    /// The query as it was understood.
    pub query: ParsedQuery,
}

impl SearchResults {
    /// Results for a query that could not be parsed.
    pub fn rejected<S: Into<String>>(reason: S) -> Self {
        SearchResults {
            hits: Vec::new(),
            rejection: Some(reason.into()),
            query: ParsedQuery::Empty,
        }
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }

    /// Document ids in ranked order.
    pub fn document_ids(&self) -> Vec<&str> {
        self.hits.iter().map(|h| h.document_id.as_str()).collect()
    }

    /// Keep at most `limit` hits.
    pub fn truncate(&mut self, limit: usize) {
        self.hits.truncate(limit);
    }
}

/// Parses query text and evaluates it against an index.
#[derive(Debug, Clone, Default)]
pub struct QueryEvaluator {
    parser: QueryParser,
}

impl QueryEvaluator {
    pub fn new() -> Self {
        QueryEvaluator {
            parser: QueryParser::new(),
        }
    }

    /// Parse and run `text`. Unparseable queries come back rejected.
    pub fn search(&self, index: &dyn TermIndex, text: &str) -> SearchResults {
        match self.parser.parse(text) {
            Ok(query) => self.evaluate(index, query),
            Err(e) => {
                warn!("rejected query '{text}': {e}");
                SearchResults::rejected(e.to_string())
            }
        }
    }

    /// Run an already parsed query.
    pub fn evaluate(&self, index: &dyn TermIndex, query: ParsedQuery) -> SearchResults {
        let postings = match &query {
            ParsedQuery::Empty => Vec::new(),
            ParsedQuery::Single(term) => index.lookup(term),
            ParsedQuery::All(terms) => {
                let terms: Vec<&str> = terms.iter().map(String::as_str).collect();
                index.lookup_all(&terms)
            }
            ParsedQuery::Exclude { include, exclude } => index.exclude(include, exclude),
        };

        let mut hits: Vec<Hit> = postings.into_iter().map(Hit::from).collect();
        hits.sort_by(rank);
        debug!("{} index: {:?} -> {} hits", index.kind(), query, hits.len());

        SearchResults {
            hits,
            rejection: None,
            query,
        }
    }
}

fn rank(a: &Hit, b: &Hit) -> Ordering {
    b.frequency
        .cmp(&a.frequency)
        .then_with(|| a.document_id.cmp(&b.document_id))
}
