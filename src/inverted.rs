// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Inverted index: per-token-id postings lists, and multi-list
//! intersection.
//!
//! The **plain** variant Elias-Fano-encodes each list directly. The
//! **blocked** variant partitions the doc-id universe into fixed-size
//! blocks and stores per-block metadata so a high-selectivity intersection
//! can skip whole blocks before refining, trading a little more memory for
//! faster skip-ahead on large lists.

use crate::config::BLOCK_SIZE;
use crate::error::{IndexError, Result};
use crate::format::{write_u32_vec, write_u64, Reader};
use crate::intvec::EliasFano;

/// One token id's ascending postings list, Elias-Fano compressed.
#[derive(Debug, Clone)]
pub struct PostingsList {
    docs: EliasFano,
}

impl PostingsList {
    pub fn build(doc_ids: &[u32], universe: u32) -> Self {
        debug_assert!(
            doc_ids.windows(2).all(|w| w[0] < w[1]),
            "postings list must be strictly increasing"
        );
        let values: Vec<u64> = doc_ids.iter().map(|&d| d as u64).collect();
        PostingsList {
            docs: EliasFano::build(&values, universe as u64),
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn access(&self, i: usize) -> u32 {
        self.docs.access(i) as u32
    }

    /// Smallest doc id `>= v` in this list, or `len()` (one past the end)
    /// if none.
    pub fn next_geq(&self, v: u32) -> usize {
        self.docs.next_geq(v as u64)
    }

    pub fn to_vec(&self) -> Vec<u32> {
        (0..self.len()).map(|i| self.access(i)).collect()
    }

    pub fn size_in_bytes(&self) -> usize {
        self.docs.size_in_bytes()
    }

    pub(crate) fn serialize(&self, buf: &mut Vec<u8>) {
        self.docs.serialize(buf);
    }

    pub(crate) fn deserialize(r: &mut Reader) -> Result<Self> {
        Ok(PostingsList {
            docs: EliasFano::deserialize(r)?,
        })
    }
}

/// Plain inverted index: one Elias-Fano postings list per token id.
#[derive(Debug, Clone)]
pub struct InvertedIndex {
    lists: Vec<PostingsList>,
}

impl InvertedIndex {
    /// `postings[term_id]` is that term's ascending doc-id list; `num_docs`
    /// is the doc-id universe shared by every list.
    pub fn build(postings: &[Vec<u32>], num_docs: u32) -> Self {
        let lists = postings
            .iter()
            .map(|p| PostingsList::build(p, num_docs.max(1)))
            .collect();
        InvertedIndex { lists }
    }

    pub fn num_terms(&self) -> usize {
        self.lists.len()
    }

    pub fn postings(&self, term_id: u32) -> &PostingsList {
        &self.lists[term_id as usize]
    }

    /// Ascending doc ids present in every list named by `term_ids`, via
    /// leapfrog (galloping) intersection driven by `next_geq` on the
    /// shortest list first. `term_ids` must be non-empty.
    pub fn intersection_iterator<'a>(&'a self, term_ids: &[u32]) -> Result<Intersection<'a>> {
        if term_ids.is_empty() {
            return Err(IndexError::InvalidQuery(
                "intersection requires at least one term".into(),
            ));
        }
        let mut lists: Vec<&'a PostingsList> = term_ids.iter().map(|&t| self.postings(t)).collect();
        lists.sort_by_key(|l| l.len());
        Ok(Intersection { lists, cursor: 0 })
    }

    pub fn size_in_bytes(&self) -> usize {
        self.lists.iter().map(PostingsList::size_in_bytes).sum::<usize>() + 24
    }

    pub(crate) fn serialize(&self, buf: &mut Vec<u8>) {
        write_u64(buf, self.lists.len() as u64);
        for list in &self.lists {
            list.serialize(buf);
        }
    }

    pub(crate) fn deserialize(r: &mut Reader) -> Result<Self> {
        let n = r.read_u64()? as usize;
        let mut lists = Vec::with_capacity(n);
        for _ in 0..n {
            lists.push(PostingsList::deserialize(r)?);
        }
        Ok(InvertedIndex { lists })
    }
}

/// Ascending-order leapfrog intersection over a set of postings lists.
pub struct Intersection<'a> {
    lists: Vec<&'a PostingsList>,
    /// Current candidate doc id; starts at 0 and only ever grows.
    cursor: u32,
}

impl Iterator for Intersection<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            let mut candidate = self.cursor;
            let mut restart = false;
            for list in &self.lists {
                let pos = list.next_geq(candidate);
                if pos >= list.len() {
                    return None;
                }
                let found = list.access(pos);
                if found != candidate {
                    candidate = found;
                    restart = true;
                    break;
                }
            }
            if restart {
                self.cursor = candidate;
                continue;
            }
            self.cursor = candidate + 1;
            return Some(candidate);
        }
    }
}

/// Blocked inverted index: like [`InvertedIndex`], but each list's doc ids
/// are partitioned into fixed-size blocks with per-block max-doc-id
/// metadata, so intersection can skip whole blocks that can't contain the
/// next candidate before refining within a block.
#[derive(Debug, Clone)]
pub struct BlockedInvertedIndex {
    lists: Vec<BlockedPostingsList>,
}

#[derive(Debug, Clone)]
struct BlockedPostingsList {
    /// Largest doc id in each block (ascending, one per block).
    block_max: Vec<u32>,
    /// All doc ids, grouped by block, each block's slice strictly
    /// increasing.
    docs: Vec<u32>,
}

impl BlockedPostingsList {
    fn build(doc_ids: &[u32]) -> Self {
        let block_max = doc_ids
            .chunks(BLOCK_SIZE)
            .map(|c| *c.last().unwrap())
            .collect();
        BlockedPostingsList {
            block_max,
            docs: doc_ids.to_vec(),
        }
    }

    fn len(&self) -> usize {
        self.docs.len()
    }

    fn access(&self, i: usize) -> u32 {
        self.docs[i]
    }

    /// Smallest doc id `>= v`, found by first skipping whole blocks via
    /// `block_max`, then binary-searching within the surviving block.
    fn next_geq(&self, v: u32) -> usize {
        let block = self.block_max.partition_point(|&m| m < v);
        if block >= self.block_max.len() {
            return self.len();
        }
        let start = block * BLOCK_SIZE;
        let end = (start + BLOCK_SIZE).min(self.len());
        start + self.docs[start..end].partition_point(|&d| d < v)
    }

    fn size_in_bytes(&self) -> usize {
        self.block_max.len() * 4 + self.docs.len() * 4 + 24
    }

    fn serialize(&self, buf: &mut Vec<u8>) {
        write_u32_vec(buf, &self.block_max);
        write_u32_vec(buf, &self.docs);
    }

    fn deserialize(r: &mut Reader) -> Result<Self> {
        let block_max = r.read_u32_vec()?;
        let docs = r.read_u32_vec()?;
        Ok(BlockedPostingsList { block_max, docs })
    }
}

impl BlockedInvertedIndex {
    pub fn build(postings: &[Vec<u32>]) -> Self {
        let lists = postings
            .iter()
            .map(|p| BlockedPostingsList::build(p))
            .collect();
        BlockedInvertedIndex { lists }
    }

    pub fn num_terms(&self) -> usize {
        self.lists.len()
    }

    pub fn intersection_iterator(&self, term_ids: &[u32]) -> Result<BlockedIntersection<'_>> {
        if term_ids.is_empty() {
            return Err(IndexError::InvalidQuery(
                "intersection requires at least one term".into(),
            ));
        }
        let mut lists: Vec<&BlockedPostingsList> =
            term_ids.iter().map(|&t| &self.lists[t as usize]).collect();
        lists.sort_by_key(|l| l.len());
        Ok(BlockedIntersection { lists, cursor: 0 })
    }

    /// A single term's own postings, block-walked the same way an
    /// intersection would be, but without the empty-input check: one term id
    /// is always in bounds, so this never fails.
    pub fn single_term_iterator(&self, term_id: u32) -> BlockedIntersection<'_> {
        BlockedIntersection {
            lists: vec![&self.lists[term_id as usize]],
            cursor: 0,
        }
    }

    pub fn size_in_bytes(&self) -> usize {
        self.lists
            .iter()
            .map(BlockedPostingsList::size_in_bytes)
            .sum::<usize>()
            + 24
    }

    pub(crate) fn serialize(&self, buf: &mut Vec<u8>) {
        write_u64(buf, self.lists.len() as u64);
        for list in &self.lists {
            list.serialize(buf);
        }
    }

    pub(crate) fn deserialize(r: &mut Reader) -> Result<Self> {
        let n = r.read_u64()? as usize;
        let mut lists = Vec::with_capacity(n);
        for _ in 0..n {
            lists.push(BlockedPostingsList::deserialize(r)?);
        }
        Ok(BlockedInvertedIndex { lists })
    }
}

pub struct BlockedIntersection<'a> {
    lists: Vec<&'a BlockedPostingsList>,
    cursor: u32,
}

impl Iterator for BlockedIntersection<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            let mut candidate = self.cursor;
            let mut restart = false;
            for list in &self.lists {
                let pos = list.next_geq(candidate);
                if pos >= list.len() {
                    return None;
                }
                let found = list.access(pos);
                if found != candidate {
                    candidate = found;
                    restart = true;
                    break;
                }
            }
            if restart {
                self.cursor = candidate;
                continue;
            }
            self.cursor = candidate + 1;
            return Some(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_finds_common_docs() {
        let postings = vec![
            vec![0, 1, 3, 5, 7],
            vec![1, 2, 3, 5, 9],
            vec![0, 1, 3, 4, 5],
        ];
        let idx = InvertedIndex::build(&postings, 10);
        let out: Vec<u32> = idx.intersection_iterator(&[0, 1, 2]).unwrap().collect();
        assert_eq!(out, vec![1, 3, 5]);
    }

    #[test]
    fn intersection_single_term_is_its_own_list() {
        let postings = vec![vec![0, 2, 4]];
        let idx = InvertedIndex::build(&postings, 5);
        let out: Vec<u32> = idx.intersection_iterator(&[0]).unwrap().collect();
        assert_eq!(out, vec![0, 2, 4]);
    }

    #[test]
    fn intersection_empty_terms_is_invalid_query() {
        let idx = InvertedIndex::build(&[vec![0, 1]], 2);
        assert!(matches!(
            idx.intersection_iterator(&[]),
            Err(IndexError::InvalidQuery(_))
        ));
    }

    #[test]
    fn intersection_no_overlap_is_empty() {
        let postings = vec![vec![0, 2, 4], vec![1, 3, 5]];
        let idx = InvertedIndex::build(&postings, 6);
        let out: Vec<u32> = idx.intersection_iterator(&[0, 1]).unwrap().collect();
        assert!(out.is_empty());
    }

    #[test]
    fn blocked_intersection_matches_plain() {
        let postings: Vec<Vec<u32>> = vec![
            (0..1000).filter(|x| x % 2 == 0).collect(),
            (0..1000).filter(|x| x % 3 == 0).collect(),
        ];
        let plain = InvertedIndex::build(&postings, 1000);
        let blocked = BlockedInvertedIndex::build(&postings);
        let a: Vec<u32> = plain.intersection_iterator(&[0, 1]).unwrap().collect();
        let b: Vec<u32> = blocked.intersection_iterator(&[0, 1]).unwrap().collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|x| x % 6 == 0));
    }

    #[test]
    fn inverted_index_serializes_round_trip() {
        let postings = vec![vec![0, 1, 3, 5, 7], vec![1, 2, 3, 5, 9]];
        let idx = InvertedIndex::build(&postings, 10);
        let mut buf = Vec::new();
        idx.serialize(&mut buf);
        let mut r = crate::format::Reader::new(&buf);
        let back = InvertedIndex::deserialize(&mut r).unwrap();
        let out: Vec<u32> = back.intersection_iterator(&[0, 1]).unwrap().collect();
        assert_eq!(out, vec![1, 3, 5]);
    }

    #[test]
    fn blocked_single_term_iterator_matches_its_own_postings() {
        let postings: Vec<Vec<u32>> = vec![(0..1000).filter(|x| x % 2 == 0).collect()];
        let idx = BlockedInvertedIndex::build(&postings);
        let out: Vec<u32> = idx.single_term_iterator(0).collect();
        assert_eq!(out, postings[0]);
    }

    #[test]
    fn blocked_inverted_index_serializes_round_trip() {
        let postings: Vec<Vec<u32>> = vec![(0..1000).filter(|x| x % 2 == 0).collect()];
        let idx = BlockedInvertedIndex::build(&postings);
        let mut buf = Vec::new();
        idx.serialize(&mut buf);
        let mut r = crate::format::Reader::new(&buf);
        let back = BlockedInvertedIndex::deserialize(&mut r).unwrap();
        let out: Vec<u32> = back.intersection_iterator(&[0]).unwrap().collect();
        assert_eq!(out.len(), 500);
    }
}
