// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error kinds at the crate boundary.
//!
//! `NotFound` is deliberately **not** surfaced through this type at the query
//! API: a missing complete token or an empty suffix range degrades to an
//! empty result iterator (see `engine::Engine::prefix_topk`), matching the
//! "failure semantics" of a completion engine where most misses are normal
//! user input, not an error condition a caller should have to handle.

use std::fmt;
use std::io;

/// Everything that can go wrong building or querying an index, except a
/// query simply matching nothing (which is not an error, see module docs).
#[derive(Debug)]
pub enum IndexError {
    /// A precondition the caller was responsible for was violated:
    /// `k > MAX_K`, an intersection requested over zero terms, or a query
    /// containing non-ASCII/non-printable bytes.
    InvalidQuery(String),
    /// A structural invariant was violated while loading a persisted index:
    /// bad magic, wrong version, truncated/oversized input, checksum
    /// mismatch, non-monotone postings, or an out-of-order dictionary.
    /// Construction aborts; there is no partially loaded engine.
    CorruptIndex(String),
    /// A read or write of a build-input file or a persisted index file
    /// failed at the OS level.
    IoError(io::Error),
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::InvalidQuery(msg) => write!(f, "invalid query: {msg}"),
            IndexError::CorruptIndex(msg) => write!(f, "corrupt index: {msg}"),
            IndexError::IoError(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for IndexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IndexError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for IndexError {
    fn from(err: io::Error) -> Self {
        IndexError::IoError(err)
    }
}

impl IndexError {
    /// Maps an error to the CLI exit code defined for it: 1 for a usage
    /// error (bad query parameters), 2 for anything I/O- or format-related.
    pub fn exit_code(&self) -> i32 {
        match self {
            IndexError::InvalidQuery(_) => 1,
            IndexError::CorruptIndex(_) | IndexError::IoError(_) => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
