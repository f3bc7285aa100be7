// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Benchmarks for end-to-end `prefix_topk`/`conjunctive_topk` queries over
//! synthetic corpora of increasing size.
//!
//! Run with: cargo bench --bench topk_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use typeahead::config::EngineParams;
use typeahead::dictionary::FrontCodedDictionary;
use typeahead::engine::Engine;
use typeahead::forward::ForwardIndex;
use typeahead::inverted::InvertedIndex;
use typeahead::minimal::MinimalDocsList;
use typeahead::trie::CompletionTrie;

/// Corpus size configurations, modeled after a query-log-scale autocomplete
/// table rather than a single blog's post count.
struct CorpusSize {
    name: &'static str,
    num_completions: usize,
    tokens_per_completion: usize,
}

const CORPUS_SIZES: &[CorpusSize] = &[
    CorpusSize {
        name: "small",
        num_completions: 1_000,
        tokens_per_completion: 3,
    },
    CorpusSize {
        name: "medium",
        num_completions: 20_000,
        tokens_per_completion: 4,
    },
    CorpusSize {
        name: "large",
        num_completions: 200_000,
        tokens_per_completion: 4,
    },
];

const VOCAB: &[&str] = &[
    "new", "york", "city", "times", "square", "pizza", "jersey", "devils", "university", "hotel",
    "restaurant", "cafe", "park", "street", "avenue", "museum", "theater", "airport", "station",
    "market",
];

fn build_corpus(num_completions: usize, tokens_per_completion: usize) -> Engine<InvertedIndex> {
    let mut tokens: Vec<Vec<u8>> = VOCAB.iter().map(|s| s.as_bytes().to_vec()).collect();
    tokens.sort();
    tokens.dedup();
    let dict = FrontCodedDictionary::build(&tokens);
    let id_of = |w: &str| dict.locate(w.as_bytes()).unwrap();
    let vocab_ids: Vec<u32> = VOCAB.iter().map(|w| id_of(w)).collect();

    let completions: Vec<Vec<u32>> = (0..num_completions)
        .map(|doc| {
            (0..tokens_per_completion)
                .map(|i| vocab_ids[(doc + i * 7) % vocab_ids.len()])
                .collect()
        })
        .collect();

    let trie = CompletionTrie::build(&completions);
    let forward = ForwardIndex::build(&completions, tokens.len() as u32);

    let mut postings = vec![Vec::new(); tokens.len()];
    for (doc_id, ids) in completions.iter().enumerate() {
        let mut seen: Vec<u32> = ids.clone();
        seen.sort_unstable();
        seen.dedup();
        for tok in seen {
            postings[tok as usize].push(doc_id as u32);
        }
    }
    let inverted = InvertedIndex::build(&postings, completions.len() as u32);
    let minimal = MinimalDocsList::build(&postings, num_completions as u32);
    let scores = typeahead::intvec::FixedWidthVec::build(
        &(0..num_completions as u64).rev().collect::<Vec<_>>(),
    );

    Engine::new(
        EngineParams::default(),
        dict,
        trie,
        inverted,
        forward,
        minimal,
        scores,
    )
}

fn bench_prefix_topk(c: &mut Criterion) {
    let mut group = c.benchmark_group("prefix_topk");
    for size in CORPUS_SIZES {
        let mut engine = build_corpus(size.num_completions, size.tokens_per_completion);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size.name), size, |b, _| {
            b.iter(|| {
                let results: Vec<_> = engine.prefix_topk(black_box("new"), black_box(10)).unwrap().collect();
                black_box(results);
            });
        });
    }
    group.finish();
}

fn bench_conjunctive_topk(c: &mut Criterion) {
    let mut group = c.benchmark_group("conjunctive_topk");
    for size in CORPUS_SIZES {
        let mut engine = build_corpus(size.num_completions, size.tokens_per_completion);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size.name), size, |b, _| {
            b.iter(|| {
                let results: Vec<_> = engine
                    .conjunctive_topk(black_box("york new"), black_box(10))
                    .unwrap()
                    .collect();
                black_box(results);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_prefix_topk, bench_conjunctive_topk);
criterion_main!(benches);
