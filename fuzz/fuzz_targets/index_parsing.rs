// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Persisted-index parsing under adversarial input.
//!
//! `PlainEngine::load`/`CompressedEngine::load` must never panic on
//! arbitrary bytes: every malformed input is rejected as `CorruptIndex`.

#![no_main]

use libfuzzer_sys::fuzz_target;
use typeahead::{CompressedEngine, PlainEngine};

fuzz_target!(|data: &[u8]| {
    let _ = PlainEngine::load(data);
    let _ = CompressedEngine::load(data);
});
