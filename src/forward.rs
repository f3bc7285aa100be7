// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Forward index: per-document token-id set, with membership testing
//! against a dictionary id range, plus the original written order needed to
//! print a completion back out.

use crate::error::Result;
use crate::format::{write_u32_vec, write_u64, Reader};
use crate::intvec::EliasFano;

/// One document's distinct token ids (Elias-Fano compressed, ascending) and
/// the permutation recovering their original written order.
#[derive(Debug, Clone)]
struct ForwardList {
    sorted_ids: EliasFano,
    /// `original_order[i]` = the token id written at position `i` in the
    /// completion's original text.
    original_order: Vec<u32>,
}

/// Per-document token-id sets for the whole corpus.
#[derive(Debug, Clone)]
pub struct ForwardIndex {
    docs: Vec<ForwardList>,
}

impl ForwardIndex {
    /// `completions[doc_id]` holds that document's token ids in original
    /// written order (may repeat a token; forward lists store the
    /// deduplicated, sorted set separately).
    pub fn build(completions: &[Vec<u32>], num_tokens: u32) -> Self {
        let docs = completions
            .iter()
            .map(|ids| {
                let mut sorted: Vec<u32> = ids.clone();
                sorted.sort_unstable();
                sorted.dedup();
                let values: Vec<u64> = sorted.iter().map(|&id| id as u64).collect();
                ForwardList {
                    sorted_ids: EliasFano::build(&values, num_tokens.max(1) as u64),
                    original_order: ids.clone(),
                }
            })
            .collect();
        ForwardIndex { docs }
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    /// True iff document `doc_id` has some token id in `[a, b)`.
    pub fn contains(&self, doc_id: u32, range: (u32, u32)) -> bool {
        let (a, b) = range;
        if a >= b {
            return false;
        }
        let list = &self.docs[doc_id as usize].sorted_ids;
        let pos = list.next_geq(a as u64);
        pos < list.len() && list.access(pos) < b as u64
    }

    /// Token ids of `doc_id` in original written order.
    pub fn original_order(&self, doc_id: u32) -> &[u32] {
        &self.docs[doc_id as usize].original_order
    }

    pub fn size_in_bytes(&self) -> usize {
        self.docs
            .iter()
            .map(|d| d.sorted_ids.size_in_bytes() + d.original_order.len() * 4 + 16)
            .sum::<usize>()
            + 24
    }

    pub(crate) fn serialize(&self, buf: &mut Vec<u8>) {
        write_u64(buf, self.docs.len() as u64);
        for doc in &self.docs {
            doc.sorted_ids.serialize(buf);
            write_u32_vec(buf, &doc.original_order);
        }
    }

    pub(crate) fn deserialize(r: &mut Reader) -> Result<Self> {
        let n = r.read_u64()? as usize;
        let mut docs = Vec::with_capacity(n);
        for _ in 0..n {
            let sorted_ids = EliasFano::deserialize(r)?;
            let original_order = r.read_u32_vec()?;
            docs.push(ForwardList {
                sorted_ids,
                original_order,
            });
        }
        Ok(ForwardIndex { docs })
    }
}
