// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the front-coded dictionary: build from an arbitrary set
//! of byte strings, then check every token round-trips through
//! `locate`/`extract` and every `locate_prefix` range actually shares the
//! queried prefix.

#![no_main]

use libfuzzer_sys::fuzz_target;
use typeahead::FrontCodedDictionary;

fuzz_target!(|words: Vec<Vec<u8>>| {
    let mut tokens: Vec<Vec<u8>> = words.into_iter().filter(|w| !w.is_empty()).collect();
    tokens.sort();
    tokens.dedup();
    if tokens.is_empty() {
        return;
    }

    let dict = FrontCodedDictionary::build(&tokens);
    assert_eq!(dict.len(), tokens.len());

    for (id, tok) in tokens.iter().enumerate() {
        assert_eq!(dict.extract(id as u32), *tok);
        assert_eq!(dict.locate(tok), Some(id as u32));
    }

    if let Some(first) = tokens.first() {
        let prefix = &first[..first.len().min(2)];
        let (lo, hi) = dict.locate_prefix(prefix);
        for id in lo..hi {
            assert!(dict.extract(id).starts_with(prefix));
        }
    }
});
