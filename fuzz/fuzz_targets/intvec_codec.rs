// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for `FixedWidthVec`/`EliasFano` construction and
//! serialization round-trips over arbitrary (sorted) integer sequences.

#![no_main]

use libfuzzer_sys::fuzz_target;
use typeahead::intvec::{EliasFano, FixedWidthVec};

fuzz_target!(|values: Vec<u16>| {
    let values64: Vec<u64> = values.iter().map(|&v| v as u64).collect();

    let fw = FixedWidthVec::build(&values64);
    for (i, &v) in values64.iter().enumerate() {
        assert_eq!(fw.access(i), v);
    }

    let mut sorted = values64.clone();
    sorted.sort_unstable();
    sorted.dedup();
    if let Some(&max) = sorted.last() {
        let ef = EliasFano::build(&sorted, max + 1);
        for (i, &v) in sorted.iter().enumerate() {
            assert_eq!(ef.access(i), v);
        }
        for &probe in &sorted {
            let pos = ef.next_geq(probe);
            assert!(pos < ef.len());
            assert!(ef.access(pos) >= probe);
        }
    }
});
