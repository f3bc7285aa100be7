// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! A static, build-once query autocompletion engine over a ranked corpus of
//! multi-token completions.
//!
//! # Architecture
//!
//! ```text
//! build::{build_plain, build_compressed}   — parse flat input files
//!          │
//!          ▼
//! dictionary::FrontCodedDictionary  ── token string <-> dense token id
//! trie::CompletionTrie              ── token-id sequence -> ranked doc ids
//! inverted::{InvertedIndex, BlockedInvertedIndex} ── token id -> doc ids
//! forward::ForwardIndex             ── doc id -> token-id set + write order
//! minimal::MinimalDocsList          ── single-incomplete-token fast path
//!          │
//!          ▼
//! engine::Engine<I>                 ── orchestrates the above per query
//!          │
//!          ▼
//! format::{write_index, read_index} ── persisted binary blob (save/load)
//! ```
//!
//! [`engine::PlainEngine`] and [`engine::CompressedEngine`] differ only in
//! which [`inverted`] representation backs them; every other component is
//! shared. [`docs_list::UnsortedDocsList`] and [`rmq::RangeMaxIndex`] are the
//! shared top-k machinery both the trie and the minimal docs list build on.
//!
//! Every structure here is built once and queried many times: there is no
//! incremental update path, no fuzzy matching, and no sharding — see each
//! module's doc comment for the invariants it upholds instead.

pub mod build;
pub mod config;
pub mod dictionary;
pub mod docs_list;
pub mod engine;
pub mod error;
pub mod format;
pub mod forward;
pub mod intvec;
pub mod inverted;
pub mod minimal;
pub mod rmq;
pub mod trie;

pub use config::{EngineParams, BLOCK_SIZE, BUCKET_SIZE, MAX_K, POOL_SIZE};
pub use dictionary::FrontCodedDictionary;
pub use docs_list::UnsortedDocsList;
pub use engine::{
    CompressedEngine, Engine, InvertedLookup, InvertedStorage, OwnedResult, PlainEngine,
    ScoredResult,
};
#[cfg(feature = "parallel")]
pub use engine::SharedEngine;
pub use error::{IndexError, Result};
pub use forward::ForwardIndex;
pub use inverted::{BlockedInvertedIndex, InvertedIndex};
pub use minimal::MinimalDocsList;
pub use trie::CompletionTrie;
