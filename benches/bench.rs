//! Criterion benchmarks comparing the hash map and trie indexes.
//!
//! - Building an index from tokenized documents
//! - Single-term and multi-term lookups
//! - Query evaluation end to end
//! - Dump serialization

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lexindex::analysis::WhitespaceTokenizer;
use lexindex::lexical::{IndexKind, TermIndex};
use lexindex::query::QueryEvaluator;

/// Generate test documents for benchmarking.
fn generate_test_documents(count: usize) -> Vec<String> {
    let words = [
        "search", "engine", "full", "text", "index", "query", "document", "term", "phrase",
        "boolean", "review", "product", "great", "terrible", "service", "food", "price", "quality",
        "delivery", "fast", "slow", "recommend", "never", "again", "excellent", "poor",
        "structure", "performance", "memory", "storage", "retrieval", "ranking",
    ];

    let mut documents = Vec::with_capacity(count);
    for i in 0..count {
        let doc_length = 50 + (i % 100); // Variable length documents
        let mut doc_words = Vec::with_capacity(doc_length);
        for j in 0..doc_length {
            let word_idx = (i * 7 + j * 13) % words.len(); // Pseudo-random distribution
            doc_words.push(words[word_idx]);
        }
        documents.push(doc_words.join(" "));
    }

    documents
}

fn build_index(kind: IndexKind, documents: &[String]) -> Box<dyn TermIndex> {
    let tokenizer = WhitespaceTokenizer::new();
    let mut index = kind.create();
    for (i, text) in documents.iter().enumerate() {
        let document_id = format!("review_{i}.txt");
        for token in tokenizer.tokenize(text) {
            index.insert(&token.text, &document_id, token.position);
        }
    }
    index
}

/// Benchmark index construction.
fn bench_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexing");
    let documents = generate_test_documents(500);
    group.throughput(Throughput::Elements(documents.len() as u64));

    for kind in IndexKind::ALL {
        group.bench_with_input(BenchmarkId::new("build", kind), &documents, |b, docs| {
            b.iter(|| black_box(build_index(kind, docs)))
        });
    }
    group.finish();
}

/// Benchmark raw index lookups.
fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let documents = generate_test_documents(1000);

    for kind in IndexKind::ALL {
        let index = build_index(kind, &documents);

        group.bench_function(BenchmarkId::new("single_term", kind), |b| {
            b.iter(|| black_box(index.lookup(black_box("review"))))
        });

        group.bench_function(BenchmarkId::new("missing_term", kind), |b| {
            b.iter(|| black_box(index.lookup(black_box("absent"))))
        });

        group.bench_function(BenchmarkId::new("all_three_terms", kind), |b| {
            b.iter(|| black_box(index.lookup_all(black_box(&["great", "food", "price"]))))
        });

        group.bench_function(BenchmarkId::new("exclude", kind), |b| {
            b.iter(|| black_box(index.exclude(black_box("great"), black_box("terrible"))))
        });
    }
    group.finish();
}

/// Benchmark parsing, evaluation and ranking together.
fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let documents = generate_test_documents(1000);
    let evaluator = QueryEvaluator::new();
    let queries = ["food", "great food", "\"fast delivery\"", "great - terrible", "price + poor"];

    for kind in IndexKind::ALL {
        let index = build_index(kind, &documents);
        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_function(BenchmarkId::new("mixed_queries", kind), |b| {
            b.iter(|| {
                for query in &queries {
                    black_box(evaluator.search(index.as_ref(), black_box(query)));
                }
            })
        });
    }
    group.finish();
}

/// Benchmark dump serialization.
fn bench_save(c: &mut Criterion) {
    let mut group = c.benchmark_group("save");
    let documents = generate_test_documents(200);

    for kind in IndexKind::ALL {
        let index = build_index(kind, &documents);
        group.bench_function(BenchmarkId::new("to_memory", kind), |b| {
            b.iter(|| {
                let mut buffer = Vec::new();
                let result = index.save(&mut buffer);
                black_box((result.is_ok(), buffer.len()))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_indexing, bench_lookup, bench_queries, bench_save);

criterion_main!(benches);
