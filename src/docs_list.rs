// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Unsorted docs list: top-k extraction over an arbitrary index range via
//! range-maximum queries.
//!
//! `doc_ids[i]` is a permutation of `0..N`; since the score-is-rank
//! invariant holds crate-wide, the implicit score at position `i` is `N -
//! doc_ids[i]` (smaller doc id, higher score). An [`RangeMaxIndex`] over
//! that implicit score array lets `topk` pull the k smallest doc ids out of
//! any subrange without a full sort.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::HashSet;

use crate::error::Result;
use crate::format::{write_u32, write_u32_vec, Reader};
use crate::rmq::RangeMaxIndex;

/// A range `[l, r)` into `doc_ids`, ordered in the max-heap by the doc id at
/// its RMQ-selected maximum-score position (smaller doc id pops first).
struct Candidate {
    l: usize,
    r: usize,
    /// Index into `doc_ids` of the max-score element within `[l, r)`.
    max_pos: usize,
    /// `doc_ids[max_pos]`, cached so the heap ordering doesn't re-touch the
    /// backing array.
    doc_id: u32,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.doc_id == other.doc_id
    }
}
impl Eq for Candidate {}
impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // BinaryHeap is a max-heap; we want smallest doc_id first, so invert.
        Reverse(self.doc_id).cmp(&Reverse(other.doc_id))
    }
}

/// A permutation of document ids plus the RMQ that drives top-k extraction
/// over arbitrary subranges.
#[derive(Debug, Clone)]
pub struct UnsortedDocsList {
    doc_ids: Vec<u32>,
    scores: Vec<u32>,
    rmq: RangeMaxIndex,
    /// The corpus document count `N`, kept around only so `serialize` can
    /// round-trip it; `scores` is already derived from it.
    num_docs: u32,
}

impl UnsortedDocsList {
    /// Builds a docs list over `doc_ids` (doc ids into a corpus of
    /// `num_docs` documents; not required to cover every id, and may repeat,
    /// see `unique` in `topk`). The implicit score at position `i` is
    /// `num_docs - doc_ids[i]`, so `num_docs` must be the true corpus
    /// document count, not `doc_ids.len()` — the two only coincide when
    /// `doc_ids` is a permutation of `0..num_docs`.
    pub fn build(doc_ids: Vec<u32>, num_docs: u32) -> Self {
        let scores: Vec<u32> = doc_ids.iter().map(|&id| num_docs - id).collect();
        let rmq = RangeMaxIndex::build(&scores);
        UnsortedDocsList {
            doc_ids,
            scores,
            rmq,
            num_docs,
        }
    }

    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }

    fn push_if_nonempty(&self, heap: &mut BinaryHeap<Candidate>, l: usize, r: usize) {
        if l >= r {
            return;
        }
        let max_pos = self.rmq.argmax_index(&self.scores, l, r);
        heap.push(Candidate {
            l,
            r,
            max_pos,
            doc_id: self.doc_ids[max_pos],
        });
    }

    /// Finds the `k` smallest doc ids in `doc_ids[range.0..range.1)`,
    /// appending them in ascending doc-id order to `out`. Returns the number
    /// emitted (`min(k, range length)`, or fewer distinct ids when
    /// `unique` is set and duplicates are skipped).
    pub fn topk(&self, range: (usize, usize), k: u32, unique: bool, out: &mut Vec<u32>) -> u32 {
        let (l, r) = range;
        debug_assert!(l <= r && r <= self.len(), "docs-list range out of bounds");
        if l >= r || k == 0 {
            return 0;
        }
        let mut heap = BinaryHeap::new();
        self.push_if_nonempty(&mut heap, l, r);
        let mut seen: Option<HashSet<u32>> = if unique { Some(HashSet::new()) } else { None };
        let mut emitted = 0u32;

        while emitted < k {
            let Some(cand) = heap.pop() else { break };
            if let Some(seen) = seen.as_mut() {
                if !seen.insert(cand.doc_id) {
                    // Duplicate: split around it and keep going without
                    // counting against k.
                    self.push_if_nonempty(&mut heap, cand.l, cand.max_pos);
                    self.push_if_nonempty(&mut heap, cand.max_pos + 1, cand.r);
                    continue;
                }
            }
            out.push(cand.doc_id);
            emitted += 1;
            self.push_if_nonempty(&mut heap, cand.l, cand.max_pos);
            self.push_if_nonempty(&mut heap, cand.max_pos + 1, cand.r);
        }
        emitted
    }

    pub fn size_in_bytes(&self) -> usize {
        self.doc_ids.len() * 4 + self.scores.len() * 4 + 28
    }

    /// The permutation plus `num_docs` are persisted; `scores` and the RMQ
    /// are derived deterministically from both, so `deserialize` just calls
    /// `build` again instead of carrying redundant bytes on disk.
    pub(crate) fn serialize(&self, buf: &mut Vec<u8>) {
        write_u32_vec(buf, &self.doc_ids);
        write_u32(buf, self.num_docs);
    }

    pub(crate) fn deserialize(r: &mut Reader) -> Result<Self> {
        let doc_ids = r.read_u32_vec()?;
        let num_docs = r.read_u32()?;
        Ok(UnsortedDocsList::build(doc_ids, num_docs))
    }
}
