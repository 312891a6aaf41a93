//! Command implementations for the lexindex CLI.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use log::debug;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::EngineConfig;
use crate::engine::SearchEngine;
use crate::lexical::index::IndexKind;

/// Execute a CLI command.
pub fn execute_command(args: LexIndexArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    debug!("effective config: {config:?}");

    match &args.command {
        Command::Index(index_args) => index_folder(index_args, config, &args),
        Command::Add(add_args) => add_file(add_args, config, &args),
        Command::Search(search_args) => search_dump(search_args, config, &args),
        Command::Dump(dump_args) => list_dump(dump_args, config, &args),
        Command::Compare(compare_args) => compare_indexes(compare_args, config, &args),
        Command::Stats(stats_args) => show_stats(stats_args, config, &args),
    }
}

/// Config file values, then command line overrides.
fn resolve_config(args: &LexIndexArgs) -> Result<EngineConfig> {
    let mut config = match &args.config_file {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(kind) = args.index_kind {
        config.index_kind = kind;
    }
    Ok(config)
}

fn dump_path(config: &EngineConfig, explicit: &Option<PathBuf>) -> PathBuf {
    explicit.clone().unwrap_or_else(|| config.dump_path.clone())
}

fn open_dump(config: EngineConfig, path: &Path) -> Result<SearchEngine> {
    let kind = config.index_kind;
    let mut engine = SearchEngine::new(config);
    engine
        .load_from(path)
        .with_context(|| format!("failed to load {kind} index from {}", path.display()))?;
    Ok(engine)
}

/// Index a folder of numbered documents and save the dump.
fn index_folder(args: &IndexArgs, config: EngineConfig, cli_args: &LexIndexArgs) -> Result<()> {
    let dump = dump_path(&config, &args.output);
    let start = Instant::now();

    let mut engine = SearchEngine::new(config);
    let indexed = engine
        .index_directory(&args.folder, args.count)
        .with_context(|| format!("failed to index {}", args.folder.display()))?;
    engine
        .save_to(&dump)
        .with_context(|| format!("failed to write {}", dump.display()))?;

    output_result(
        "Documents indexed successfully",
        &IndexingResult {
            index: engine.active_kind(),
            documents_indexed: indexed,
            total_terms: engine.index().term_count(),
            dump_path: dump,
            duration_ms: start.elapsed().as_millis() as u64,
        },
        cli_args,
    )?;
    Ok(())
}

/// Add one file to a dump, creating the dump if it does not exist yet.
fn add_file(args: &AddArgs, config: EngineConfig, cli_args: &LexIndexArgs) -> Result<()> {
    let dump = dump_path(&config, &args.output);
    let mut engine = if dump.exists() {
        open_dump(config, &dump)?
    } else {
        SearchEngine::new(config)
    };

    let added = engine
        .index_file(&args.file)
        .with_context(|| format!("failed to index {}", args.file.display()))?;
    if added {
        engine
            .save_to(&dump)
            .with_context(|| format!("failed to write {}", dump.display()))?;
    }

    output_result(
        "File added",
        &AdditionResult {
            index: engine.active_kind(),
            file: args.file.clone(),
            added,
            total_documents: engine.indexed_count(),
            dump_path: dump,
        },
        cli_args,
    )?;
    Ok(())
}

/// Run a query against a dump.
fn search_dump(args: &SearchArgs, config: EngineConfig, cli_args: &LexIndexArgs) -> Result<()> {
    let dump = dump_path(&config, &args.dump);
    let limit = args.limit.unwrap_or(config.default_limit);
    let engine = open_dump(config, &dump)?;

    let start = Instant::now();
    let mut results = engine.search(&args.query);
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    let total_hits = results.len();
    results.truncate(limit);

    output_result(
        "Search completed",
        &SearchReport {
            index: engine.active_kind(),
            total_hits,
            duration_ms,
            results,
        },
        cli_args,
    )?;
    Ok(())
}

/// List the terms of a dump.
fn list_dump(args: &DumpArgs, config: EngineConfig, cli_args: &LexIndexArgs) -> Result<()> {
    let dump = dump_path(&config, &args.dump);
    let engine = open_dump(config, &dump)?;

    let terms = engine
        .index()
        .entries()
        .into_iter()
        .map(|(term, postings)| TermListing {
            term,
            postings: postings.to_vec(),
        })
        .collect();

    output_result(
        "Dump contents",
        &DumpListing {
            index: engine.active_kind(),
            terms,
        },
        cli_args,
    )?;
    Ok(())
}

/// Build both indexes from the same folder and time lookups on each.
fn compare_indexes(args: &CompareArgs, config: EngineConfig, cli_args: &LexIndexArgs) -> Result<()> {
    let mut engine = SearchEngine::new(config);

    let mut documents = 0;
    for kind in IndexKind::ALL {
        engine.set_active(kind);
        documents = engine
            .index_directory(&args.folder, args.count)
            .with_context(|| format!("failed to index {} into the {kind} index", args.folder.display()))?;
    }

    let report = engine.compare_performance(&args.queries);
    output_result(
        "Performance comparison",
        &ComparisonResult::new(documents, &report),
        cli_args,
    )?;
    Ok(())
}

/// Show statistics for a dump.
fn show_stats(args: &StatsArgs, config: EngineConfig, cli_args: &LexIndexArgs) -> Result<()> {
    let dump = dump_path(&config, &args.dump);
    let engine = open_dump(config, &dump)?;

    output_result("Index statistics", &engine.stats(), cli_args)?;
    Ok(())
}
