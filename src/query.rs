//! Query parsing and evaluation over any [`TermIndex`](crate::lexical::TermIndex).

pub mod evaluator;
pub mod parser;

pub use evaluator::{Hit, QueryEvaluator, SearchResults};
pub use parser::{ParsedQuery, QueryParser};
