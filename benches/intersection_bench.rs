// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Benchmarks comparing plain (Elias-Fano) and blocked postings-list
//! intersection over synthetic postings of increasing length and
//! selectivity.
//!
//! Run with: cargo bench --bench intersection_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use typeahead::inverted::{BlockedInvertedIndex, InvertedIndex};

struct ListSize {
    name: &'static str,
    universe: u32,
}

const LIST_SIZES: &[ListSize] = &[
    ListSize {
        name: "small",
        universe: 10_000,
    },
    ListSize {
        name: "medium",
        universe: 200_000,
    },
    ListSize {
        name: "large",
        universe: 2_000_000,
    },
];

/// Two postings lists over `[0, universe)`: every 3rd doc id and every 7th,
/// so their intersection (every 21st) is sparse relative to either list.
fn postings_pair(universe: u32) -> Vec<Vec<u32>> {
    vec![
        (0..universe).step_by(3).collect(),
        (0..universe).step_by(7).collect(),
    ]
}

fn bench_plain_intersection(c: &mut Criterion) {
    let mut group = c.benchmark_group("plain_intersection");
    for size in LIST_SIZES {
        let postings = postings_pair(size.universe);
        let idx = InvertedIndex::build(&postings, size.universe);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size.name), size, |b, _| {
            b.iter(|| {
                let out: Vec<u32> = idx.intersection_iterator(black_box(&[0, 1])).unwrap().collect();
                black_box(out);
            });
        });
    }
    group.finish();
}

fn bench_blocked_intersection(c: &mut Criterion) {
    let mut group = c.benchmark_group("blocked_intersection");
    for size in LIST_SIZES {
        let postings = postings_pair(size.universe);
        let idx = BlockedInvertedIndex::build(&postings);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size.name), size, |b, _| {
            b.iter(|| {
                let out: Vec<u32> = idx.intersection_iterator(black_box(&[0, 1])).unwrap().collect();
                black_box(out);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_plain_intersection, bench_blocked_intersection);
criterion_main!(benches);
