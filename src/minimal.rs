// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Minimal docs list: the degenerate single-incomplete-token conjunctive
//! path.
//!
//! When a query is a single incomplete token (no complete tokens typed at
//! all, e.g. `"york"`), conjunctive top-k has nothing to intersect. Rather
//! than special-casing the trie or opening an inverted-index union at query
//! time, we precompute one [`UnsortedDocsList`](crate::docs_list::UnsortedDocsList)
//! whose leaf order is every term's postings concatenated in ascending
//! token-id order. A token-id range then maps to a contiguous leaf range by
//! construction, and `unique=true` top-k collapses documents that show up
//! under more than one token in the range.

use crate::docs_list::UnsortedDocsList;
use crate::error::Result;
use crate::format::{write_u32_vec, Reader};

#[derive(Debug, Clone)]
pub struct MinimalDocsList {
    /// `offsets[t]..offsets[t + 1]` is the span, in the underlying docs
    /// list, of term `t`'s postings. Length `num_terms + 1`.
    offsets: Vec<u32>,
    docs_list: UnsortedDocsList,
}

impl MinimalDocsList {
    /// `postings[term_id]` is that term's ascending doc-id postings list.
    /// `num_docs` is the corpus document count, not `postings`' own total
    /// incidence count (the concatenated array's length): a doc id can
    /// exceed that length when a document is the sole posting under a term
    /// near the end of the dictionary, so the two must not be conflated when
    /// computing the implicit score.
    pub fn build(postings: &[Vec<u32>], num_docs: u32) -> Self {
        let mut offsets = Vec::with_capacity(postings.len() + 1);
        let mut concatenated = Vec::new();
        offsets.push(0u32);
        for list in postings {
            concatenated.extend_from_slice(list);
            offsets.push(concatenated.len() as u32);
        }
        MinimalDocsList {
            offsets,
            docs_list: UnsortedDocsList::build(concatenated, num_docs),
        }
    }

    /// Maps a 0-based dictionary id range `[lo, hi)` to the contiguous leaf
    /// range spanning those terms' postings.
    pub fn range_for(&self, term_range: (u32, u32)) -> (u32, u32) {
        let (lo, hi) = term_range;
        if lo >= hi || hi as usize >= self.offsets.len() {
            return (0, 0);
        }
        (self.offsets[lo as usize], self.offsets[hi as usize])
    }

    /// Top-k distinct doc ids (ascending) among the union of postings for
    /// terms in `term_range`.
    pub fn topk(&self, term_range: (u32, u32), k: u32, out: &mut Vec<u32>) -> u32 {
        let (l, r) = self.range_for(term_range);
        if l >= r {
            return 0;
        }
        self.docs_list
            .topk((l as usize, r as usize), k, true, out)
    }

    pub fn size_in_bytes(&self) -> usize {
        self.offsets.len() * 4 + self.docs_list.size_in_bytes() + 24
    }

    pub(crate) fn serialize(&self, buf: &mut Vec<u8>) {
        write_u32_vec(buf, &self.offsets);
        self.docs_list.serialize(buf);
    }

    pub(crate) fn deserialize(r: &mut Reader) -> Result<Self> {
        let offsets = r.read_u32_vec()?;
        let docs_list = UnsortedDocsList::deserialize(r)?;
        Ok(MinimalDocsList { offsets, docs_list })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topk_unions_and_dedups_across_term_range() {
        // term 0's postings: {0, 1, 3}; term 1's postings: {2, 3}
        let postings = vec![vec![0, 1, 3], vec![2, 3]];
        let minimal = MinimalDocsList::build(&postings, 4);
        let mut out = Vec::new();
        let n = minimal.topk((0, 2), 10, &mut out);
        assert_eq!(n, 4);
        assert_eq!(out, vec![0, 1, 2, 3]);
    }

    #[test]
    fn topk_single_term_range_matches_its_postings() {
        let postings = vec![vec![0, 1, 3], vec![2, 3]];
        let minimal = MinimalDocsList::build(&postings, 4);
        let mut out = Vec::new();
        minimal.topk((0, 1), 10, &mut out);
        assert_eq!(out, vec![0, 1, 3]);
    }

    #[test]
    fn topk_handles_a_high_doc_id_under_a_short_postings_list() {
        // A 100-document corpus where term 0's only posting is doc 99: the
        // concatenated minimal-postings array has length 1, far shorter than
        // the doc id it holds. Scoring against that length instead of the
        // true corpus size would underflow; against the real corpus size
        // (100) it must not, and must still return doc 99.
        let postings = vec![vec![99]];
        let minimal = MinimalDocsList::build(&postings, 100);
        let mut out = Vec::new();
        let n = minimal.topk((0, 1), 5, &mut out);
        assert_eq!(n, 1);
        assert_eq!(out, vec![99]);
    }

    #[test]
    fn minimal_docs_list_serializes_round_trip() {
        let postings = vec![vec![0, 1, 3], vec![2, 3]];
        let minimal = MinimalDocsList::build(&postings, 4);
        let mut buf = Vec::new();
        minimal.serialize(&mut buf);
        let mut r = Reader::new(&buf);
        let back = MinimalDocsList::deserialize(&mut r).unwrap();
        let mut out = Vec::new();
        back.topk((0, 2), 10, &mut out);
        assert_eq!(out, vec![0, 1, 2, 3]);
    }
}
