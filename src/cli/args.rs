//! Command line argument parsing for the lexindex CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::lexical::index::IndexKind;

/// lexindex - word-position search over a hash map or trie index
#[derive(Parser, Debug, Clone)]
#[command(name = "lexindex")]
#[command(about = "Index text documents and run boolean queries with a hash map or trie index")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct LexIndexArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Index implementation to use (overrides the config file)
    #[arg(short = 'i', long = "index", global = true)]
    pub index_kind: Option<IndexKind>,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Engine configuration file (JSON)
    #[arg(short = 'c', long = "config", env = "LEXINDEX_CONFIG", global = true)]
    pub config_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LexIndexArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Index numbered documents from a folder and save a dump
    Index(IndexArgs),

    /// Add one file to an existing dump
    Add(AddArgs),

    /// Run a query against a dump
    Search(SearchArgs),

    /// List every term and its postings in a dump
    Dump(DumpArgs),

    /// Time single-term lookups on both indexes
    Compare(CompareArgs),

    /// Show index statistics
    Stats(StatsArgs),
}

/// Arguments for indexing a folder
#[derive(Parser, Debug, Clone)]
pub struct IndexArgs {
    /// Folder holding review_<n>.txt files
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Number of documents to index
    #[arg(short = 'n', long, default_value = "100")]
    pub count: usize,

    /// Dump file to write (default: from config)
    #[arg(short, long, value_name = "DUMP")]
    pub output: Option<PathBuf>,
}

/// Arguments for adding a single file
#[derive(Parser, Debug, Clone)]
pub struct AddArgs {
    /// Text file to add
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Dump file to update; created if missing
    #[arg(short, long, value_name = "DUMP")]
    pub output: Option<PathBuf>,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Query string: `word`, `w1 w2`, `"w1 w2"`, `w1 - w2`, or `w1 + w2`
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Dump file to search
    #[arg(short, long, value_name = "DUMP")]
    pub dump: Option<PathBuf>,

    /// Maximum number of results to show
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for listing a dump
#[derive(Parser, Debug, Clone)]
pub struct DumpArgs {
    /// Dump file to read
    #[arg(short, long, value_name = "DUMP")]
    pub dump: Option<PathBuf>,
}

/// Arguments for the lookup timing comparison
#[derive(Parser, Debug, Clone)]
pub struct CompareArgs {
    /// Folder holding review_<n>.txt files
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Number of documents to index into each index
    #[arg(short = 'n', long, default_value = "100")]
    pub count: usize,

    /// Words to look up
    #[arg(value_name = "QUERY", required = true)]
    pub queries: Vec<String>,
}

/// Arguments for index statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Dump file to read
    #[arg(short, long, value_name = "DUMP")]
    pub dump: Option<PathBuf>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_search_command() {
        let args = LexIndexArgs::try_parse_from([
            "lexindex",
            "search",
            "cat - dog",
            "--dump",
            "reviews.dat",
            "--limit",
            "5",
        ])
        .unwrap();

        if let Command::Search(search_args) = args.command {
            assert_eq!(search_args.query, "cat - dog");
            assert_eq!(search_args.dump, Some(PathBuf::from("reviews.dat")));
            assert_eq!(search_args.limit, Some(5));
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_index_command() {
        let args = LexIndexArgs::try_parse_from([
            "lexindex", "--index", "trie", "index", "corpus", "-n", "25", "-o", "out.dat",
        ])
        .unwrap();

        assert_eq!(args.index_kind, Some(IndexKind::Trie));
        if let Command::Index(index_args) = args.command {
            assert_eq!(index_args.folder, PathBuf::from("corpus"));
            assert_eq!(index_args.count, 25);
            assert_eq!(index_args.output, Some(PathBuf::from("out.dat")));
        } else {
            panic!("Expected Index command");
        }
    }

    #[test]
    fn test_compare_requires_queries() {
        assert!(LexIndexArgs::try_parse_from(["lexindex", "compare", "corpus"]).is_err());

        let args =
            LexIndexArgs::try_parse_from(["lexindex", "compare", "corpus", "cat", "dog"]).unwrap();
        if let Command::Compare(compare_args) = args.command {
            assert_eq!(compare_args.queries, vec!["cat", "dog"]);
            assert_eq!(compare_args.count, 100);
        } else {
            panic!("Expected Compare command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        let args = LexIndexArgs::try_parse_from(["lexindex", "stats"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = LexIndexArgs::try_parse_from(["lexindex", "-vv", "stats"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args = LexIndexArgs::try_parse_from(["lexindex", "stats", "--quiet"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args = LexIndexArgs::try_parse_from(["lexindex", "--format", "json", "dump"]).unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
        assert!(LexIndexArgs::try_parse_from(["lexindex", "--index", "btree", "dump"]).is_err());
    }
}
