// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Build- and query-time tunables.
//!
//! These are plain constants rather than a config file format: the spec
//! names no external configuration input, and every tunable here has a
//! sensible compiled-in default that the CLI can override per invocation.

/// Bucket size for the front-coded dictionary. Fixed at compile time because
/// every front-coded section on disk is built and read with the same value.
pub const BUCKET_SIZE: usize = 16;

/// Hard ceiling on `k` for any top-k query. Requesting more is `InvalidQuery`.
pub const MAX_K: u32 = 15;

/// Byte capacity of the per-engine result string pool.
pub const POOL_SIZE: usize = 1024;

/// Block size for the blocked inverted index variant.
pub const BLOCK_SIZE: usize = 128;

/// Runtime-overridable parameters threaded into engine construction.
///
/// The compiled-in constants above remain the defaults; `EngineParams` lets
/// the CLI (or a test) override `k`'s ceiling without recompiling, the way
/// the reference crate threads a small params struct into its constructors
/// rather than reading a config file.
#[derive(Debug, Clone, Copy)]
pub struct EngineParams {
    pub max_k: u32,
    pub pool_size: usize,
}

impl Default for EngineParams {
    fn default() -> Self {
        EngineParams {
            max_k: MAX_K,
            pool_size: POOL_SIZE,
        }
    }
}
