//! Output formatting for CLI commands.

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::args::{LexIndexArgs, OutputFormat};
use crate::engine::{IndexStats, PerformanceReport};
use crate::error::Result;
use crate::lexical::index::IndexKind;
use crate::lexical::posting::Posting;
use crate::query::evaluator::SearchResults;

/// Result structure for folder indexing.
#[derive(Debug, Serialize)]
pub struct IndexingResult {
    pub index: IndexKind,
    pub documents_indexed: usize,
    pub total_terms: usize,
    pub dump_path: PathBuf,
    pub duration_ms: u64,
}

/// Result structure for adding a single file.
#[derive(Debug, Serialize)]
pub struct AdditionResult {
    pub index: IndexKind,
    pub file: PathBuf,
    pub added: bool,
    pub total_documents: usize,
    pub dump_path: PathBuf,
}

/// Result structure for search operations.
#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub index: IndexKind,
    pub total_hits: usize,
    pub duration_ms: f64,
    #[serde(flatten)]
    pub results: SearchResults,
}

/// One term of a dump listing.
#[derive(Debug, Serialize)]
pub struct TermListing {
    pub term: String,
    pub postings: Vec<Posting>,
}

/// Every term stored in a dump.
#[derive(Debug, Serialize)]
pub struct DumpListing {
    pub index: IndexKind,
    pub terms: Vec<TermListing>,
}

/// Lookup timing comparison.
#[derive(Debug, Serialize)]
pub struct ComparisonResult {
    pub documents: usize,
    pub queries: usize,
    pub hash_ms: f64,
    pub trie_ms: f64,
    pub faster: Option<IndexKind>,
}

impl ComparisonResult {
    pub fn new(documents: usize, report: &PerformanceReport) -> Self {
        ComparisonResult {
            documents,
            queries: report.queries,
            hash_ms: report.hash.as_secs_f64() * 1000.0,
            trie_ms: report.trie.as_secs_f64() * 1000.0,
            faster: report.faster(),
        }
    }
}

/// Something a command can print for a person to read.
pub trait HumanOutput {
    fn print_human(&self);
}

impl HumanOutput for IndexingResult {
    fn print_human(&self) {
        println!("Index: {}", self.index);
        println!("Documents indexed: {}", self.documents_indexed);
        println!("Total terms: {}", self.total_terms);
        println!("Dump: {}", self.dump_path.display());
        println!("Time: {}ms", self.duration_ms);
    }
}

impl HumanOutput for AdditionResult {
    fn print_human(&self) {
        if self.added {
            println!("Added {} to the {} index", self.file.display(), self.index);
        } else {
            println!("{} is already indexed", self.file.display());
        }
        println!("Total documents: {}", self.total_documents);
        println!("Dump: {}", self.dump_path.display());
    }
}

impl HumanOutput for SearchReport {
    fn print_human(&self) {
        if let Some(reason) = &self.results.rejection {
            println!("Query rejected: {reason}");
            return;
        }
        if self.results.is_empty() {
            println!("No results found.");
            return;
        }

        println!("Search Results ({} index):", self.index);
        println!("═══════════════");
        for (i, hit) in self.results.hits.iter().enumerate() {
            println!(
                "{}. {} (frequency: {}, positions: {})",
                i + 1,
                hit.document_id,
                hit.frequency,
                join_positions(&hit.positions)
            );
        }
        println!();
        println!("Total hits: {}", self.total_hits);
        println!("Search time: {:.3}ms", self.duration_ms);
    }
}

impl HumanOutput for DumpListing {
    fn print_human(&self) {
        println!("{} index, {} terms", self.index, self.terms.len());
        for listing in &self.terms {
            println!("{}", listing.term);
            for posting in &listing.postings {
                println!(
                    "  {} [{}]",
                    posting.document_id,
                    join_positions(&posting.positions)
                );
            }
        }
    }
}

impl HumanOutput for ComparisonResult {
    fn print_human(&self) {
        println!("Lookup Timing:");
        println!("══════════════");
        println!("Documents per index: {}", self.documents);
        println!("Queries: {}", self.queries);
        println!("HashMap search time: {:.3}ms", self.hash_ms);
        println!("Trie search time: {:.3}ms", self.trie_ms);
        match self.faster {
            Some(kind) => println!("Faster: {kind}"),
            None => println!("Faster: tie"),
        }
    }
}

impl HumanOutput for IndexStats {
    fn print_human(&self) {
        println!("Index Statistics:");
        println!("════════════════");
        println!("Index: {}", self.kind);
        println!("Total documents: {}", self.documents);
        println!("Total terms: {}", self.terms);
        println!("Total postings: {}", self.postings);
        if let Some(nodes) = self.nodes {
            println!("Trie nodes: {nodes}");
        }
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &LexIndexArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &LexIndexArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

fn join_positions(positions: &[i32]) -> String {
    positions
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
