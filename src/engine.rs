// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query engine: parses a partially typed query, orchestrates the
//! dictionary/trie/inverted/forward lookups, and assembles top-k result
//! strings into a per-engine scratch pool.
//!
//! Two concrete engines share this module's parse/assemble logic but differ
//! in which inverted-index variant and dictionary payload they hold:
//! [`PlainEngine`] (uncompressed postings intersection path with a
//! byte-string dictionary) and [`CompressedEngine`] (blocked postings,
//! same dictionary type — the spec's "compressed engine" differs from
//! plain in its inverted-index representation, not in dictionary type,
//! since the numeric front-coded dictionary variant is a build-time
//! artifact of the alternate engines, not swapped in here). Selection
//! between them happens once, at construction, never per query.

use crate::config::EngineParams;
use crate::dictionary::FrontCodedDictionary;
use crate::error::{IndexError, Result};
use crate::format::{self, write_u64, IndexHeader, Reader, VARIANT_BLOCKED, VARIANT_PLAIN};
use crate::forward::ForwardIndex;
use crate::intvec::FixedWidthVec;
use crate::inverted::{BlockedInvertedIndex, InvertedIndex};
use crate::minimal::MinimalDocsList;
use crate::trie::CompletionTrie;

/// One scored completion string, borrowed from the engine's result pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredResult<'a> {
    pub score: u32,
    pub text: &'a str,
}

/// Per-engine mutable scratch: the result byte pool and associated
/// doc-id/offset bookkeeping. Cleared at the start of every query.
///
/// Bounded at `capacity` bytes of string storage (§5's `POOL_SIZE`): a
/// result that would overflow the budget is simply not appended, rather
/// than growing the pool past its declared size. `MAX_K`'s cap on `k`
/// already bounds the number of score slots.
#[derive(Debug, Default)]
struct ResultPool {
    bytes: Vec<u8>,
    /// End offset (exclusive) of each result's text within `bytes`.
    ends: Vec<u32>,
    /// Score of each result, parallel to `ends`.
    scores: Vec<u32>,
    capacity: usize,
}

impl ResultPool {
    fn clear(&mut self) {
        self.bytes.clear();
        self.ends.clear();
        self.scores.clear();
    }

    /// Appends one result's text if it fits within the remaining pool
    /// budget; otherwise drops it (and every result after it, since callers
    /// push in descending-score order). Returns whether it was appended.
    fn push(&mut self, score: u32, text: &[u8]) -> bool {
        if self.bytes.len() + text.len() > self.capacity {
            return false;
        }
        self.bytes.extend_from_slice(text);
        self.ends.push(self.bytes.len() as u32);
        self.scores.push(score);
        true
    }

    fn iter(&self) -> impl Iterator<Item = ScoredResult<'_>> {
        let mut start = 0u32;
        self.ends.iter().zip(self.scores.iter()).map(move |(&end, &score)| {
            let text = std::str::from_utf8(&self.bytes[start as usize..end as usize])
                .unwrap_or_default();
            start = end;
            ScoredResult { score, text }
        })
    }
}

/// Parsed query: ids for every complete token, plus the incomplete
/// trailing token's dictionary prefix range.
struct ParsedQuery {
    complete_ids: Vec<u32>,
    suffix_range: (u32, u32),
}

fn parse_query(query: &str, dict: &FrontCodedDictionary) -> Option<ParsedQuery> {
    if query.trim().is_empty() {
        return None;
    }
    let ends_with_space = query.ends_with(' ');
    let tokens: Vec<&str> = query.split(' ').filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() {
        return None;
    }
    let (complete_tokens, suffix) = if ends_with_space {
        (&tokens[..], "")
    } else {
        (&tokens[..tokens.len() - 1], tokens[tokens.len() - 1])
    };

    let mut complete_ids = Vec::with_capacity(complete_tokens.len());
    for tok in complete_tokens {
        let id = dict.locate(tok.as_bytes())?;
        complete_ids.push(id);
    }
    let suffix_range = dict.locate_prefix(suffix.as_bytes());
    if suffix_range.0 >= suffix_range.1 {
        return None;
    }
    Some(ParsedQuery {
        complete_ids,
        suffix_range,
    })
}

/// Shared orchestration: a query engine over a dictionary, completion
/// trie + its docs list, an inverted index (generic over plain/blocked
/// representation), a forward index, and a minimal docs list for the
/// degenerate single-token conjunctive path.
pub struct Engine<I> {
    params: EngineParams,
    dictionary: FrontCodedDictionary,
    trie: CompletionTrie,
    inverted: I,
    forward: ForwardIndex,
    minimal: MinimalDocsList,
    /// `scores[doc_id]` is the caller-supplied score from `.completions`,
    /// preserved verbatim for display; doc-id ordering (not this array) is
    /// what top-k ranking actually relies on.
    scores: FixedWidthVec,
    pool: ResultPool,
    /// Reused scratch buffer for building one completion's text before it
    /// is appended to the pool; avoids a fresh allocation per result.
    scratch: Vec<u8>,
}

/// Minimal contract an inverted-index representation must satisfy to back
/// an [`Engine`]: an ascending-order iterator over a single term's
/// postings, and over the intersection of several terms.
pub trait InvertedLookup {
    fn single_term(&self, term_id: u32) -> Box<dyn Iterator<Item = u32> + '_>;
    fn intersect<'a>(&'a self, term_ids: &[u32]) -> Result<Box<dyn Iterator<Item = u32> + 'a>>;
    fn size_in_bytes(&self) -> usize;
}

impl InvertedLookup for InvertedIndex {
    fn single_term(&self, term_id: u32) -> Box<dyn Iterator<Item = u32> + '_> {
        Box::new(self.postings(term_id).to_vec().into_iter())
    }

    fn intersect<'a>(&'a self, term_ids: &[u32]) -> Result<Box<dyn Iterator<Item = u32> + 'a>> {
        Ok(Box::new(self.intersection_iterator(term_ids)?))
    }

    fn size_in_bytes(&self) -> usize {
        InvertedIndex::size_in_bytes(self)
    }
}

/// Persistence contract for an inverted-index representation: lets
/// [`Engine::save`]/[`Engine::load`] stay generic over plain vs. blocked
/// postings while still tagging which one a blob was built with.
pub trait InvertedStorage: Sized {
    const VARIANT: u8;
    fn serialize_into(&self, buf: &mut Vec<u8>);
    fn deserialize_from(r: &mut Reader) -> Result<Self>;
}

impl InvertedStorage for InvertedIndex {
    const VARIANT: u8 = VARIANT_PLAIN;

    fn serialize_into(&self, buf: &mut Vec<u8>) {
        self.serialize(buf);
    }

    fn deserialize_from(r: &mut Reader) -> Result<Self> {
        InvertedIndex::deserialize(r)
    }
}

impl InvertedStorage for BlockedInvertedIndex {
    const VARIANT: u8 = VARIANT_BLOCKED;

    fn serialize_into(&self, buf: &mut Vec<u8>) {
        self.serialize(buf);
    }

    fn deserialize_from(r: &mut Reader) -> Result<Self> {
        BlockedInvertedIndex::deserialize(r)
    }
}

impl InvertedLookup for BlockedInvertedIndex {
    fn single_term(&self, term_id: u32) -> Box<dyn Iterator<Item = u32> + '_> {
        Box::new(self.single_term_iterator(term_id))
    }

    fn intersect<'a>(&'a self, term_ids: &[u32]) -> Result<Box<dyn Iterator<Item = u32> + 'a>> {
        Ok(Box::new(self.intersection_iterator(term_ids)?))
    }

    fn size_in_bytes(&self) -> usize {
        BlockedInvertedIndex::size_in_bytes(self)
    }
}

impl<I: InvertedLookup> Engine<I> {
    pub fn new(
        params: EngineParams,
        dictionary: FrontCodedDictionary,
        trie: CompletionTrie,
        inverted: I,
        forward: ForwardIndex,
        minimal: MinimalDocsList,
        scores: FixedWidthVec,
    ) -> Self {
        let pool = ResultPool {
            capacity: params.pool_size,
            ..ResultPool::default()
        };
        Engine {
            params,
            dictionary,
            trie,
            inverted,
            forward,
            minimal,
            scores,
            pool,
            scratch: Vec::new(),
        }
    }

    pub fn bytes(&self) -> u64 {
        (self.dictionary.size_in_bytes()
            + self.trie.size_in_bytes()
            + self.inverted.size_in_bytes()
            + self.forward.size_in_bytes()
            + self.minimal.size_in_bytes()
            + self.scores.size_in_bytes()) as u64
    }

    fn check_k(&self, k: u32) -> Result<()> {
        if k > self.params.max_k {
            return Err(IndexError::InvalidQuery(format!(
                "k={k} exceeds max_k={}",
                self.params.max_k
            )));
        }
        Ok(())
    }

    /// Decodes `doc_ids` (already the top-k, ascending) into the result
    /// pool, reading each document's original score straight back out of
    /// `scores` rather than re-deriving it from rank. Stops early if a
    /// result would overflow the pool's byte budget; `doc_ids` is already
    /// in descending-score order, so what's dropped is always the lowest
    /// ranked of the batch.
    fn assemble(&mut self, doc_ids: &[u32]) {
        self.pool.clear();
        for &doc_id in doc_ids {
            self.scratch.clear();
            for (i, &tok) in self.forward.original_order(doc_id).iter().enumerate() {
                if i > 0 {
                    self.scratch.push(b' ');
                }
                self.scratch.extend_from_slice(&self.dictionary.extract(tok));
            }
            let score = self.scores.access(doc_id as usize) as u32;
            if !self.pool.push(score, &self.scratch) {
                break;
            }
        }
    }

    /// Prefix-mode top-k: completions that begin with the typed tokens in
    /// order. Returns an iterator of `(score, text)` borrowed from the
    /// engine's result pool; empty on any parse/lookup failure. The pool is
    /// cleared and repopulated on every call, so results from a previous
    /// call do not outlive the next one.
    pub fn prefix_topk(
        &mut self,
        query: &str,
        k: u32,
    ) -> Result<impl Iterator<Item = ScoredResult<'_>>> {
        self.check_k(k)?;
        self.pool.clear();
        let doc_ids = if k == 0 {
            Vec::new()
        } else {
            match parse_query(query, &self.dictionary) {
                None => Vec::new(),
                Some(parsed) => {
                    let leaf_range = self
                        .trie
                        .locate_prefix(&parsed.complete_ids, parsed.suffix_range);
                    let mut out = Vec::new();
                    self.trie.topk(leaf_range, k, &mut out);
                    out
                }
            }
        };
        self.assemble(&doc_ids);
        Ok(self.pool.iter())
    }

    /// Conjunctive-mode top-k: completions containing every complete token
    /// plus at least one token matching the incomplete suffix, in any
    /// order.
    pub fn conjunctive_topk(
        &mut self,
        query: &str,
        k: u32,
    ) -> Result<impl Iterator<Item = ScoredResult<'_>>> {
        self.check_k(k)?;
        self.pool.clear();
        let mut doc_ids = Vec::new();
        if k > 0 {
            if let Some(parsed) = parse_query(query, &self.dictionary) {
                if parsed.complete_ids.is_empty() {
                    // Degenerate single-incomplete-token case.
                    self.minimal.topk(parsed.suffix_range, k, &mut doc_ids);
                } else {
                    let iter: Box<dyn Iterator<Item = u32> + '_> =
                        if parsed.complete_ids.len() == 1 {
                            self.inverted.single_term(parsed.complete_ids[0])
                        } else {
                            self.inverted.intersect(&parsed.complete_ids)?
                        };
                    for doc_id in iter {
                        if doc_ids.len() as u32 >= k {
                            break;
                        }
                        if self.forward.contains(doc_id, parsed.suffix_range) {
                            doc_ids.push(doc_id);
                        }
                    }
                }
            }
        }
        self.assemble(&doc_ids);
        Ok(self.pool.iter())
    }
}

impl<I: InvertedLookup + InvertedStorage> Engine<I> {
    /// Serializes the whole engine (dictionary, trie + its embedded docs
    /// list, inverted index, forward index, minimal docs list) as one
    /// framed, CRC-checked blob.
    pub fn save<W: std::io::Write>(&self, w: &mut W) -> Result<()> {
        let num_tokens = self.dictionary.len() as u64;
        let num_docs = self.trie.num_docs() as u64;

        let mut trie_section = Vec::new();
        self.trie.serialize(&mut trie_section);

        let mut dict_section = Vec::new();
        self.dictionary.serialize(&mut dict_section);

        let mut inverted_section = Vec::new();
        self.inverted.serialize_into(&mut inverted_section);

        let mut forward_section = Vec::new();
        self.forward.serialize(&mut forward_section);

        let mut minimal_section = Vec::new();
        self.minimal.serialize(&mut minimal_section);

        let mut scores_section = Vec::new();
        self.scores.serialize(&mut scores_section);

        let mut params_section = Vec::new();
        write_u64(&mut params_section, self.params.pool_size as u64);

        let header = IndexHeader {
            version: format::VERSION,
            bucket_size: crate::config::BUCKET_SIZE as u32,
            max_k: self.params.max_k,
            variant: I::VARIANT,
            num_docs,
            num_tokens,
            num_terms: num_tokens,
        };

        format::write_index(
            w,
            header,
            &[
                &trie_section,
                &dict_section,
                &inverted_section,
                &forward_section,
                &minimal_section,
                &scores_section,
                &params_section,
            ],
        )
    }

    /// Deserializes an engine previously written by [`Engine::save`].
    /// Validates the structural framing (magic, version, size, CRC32) and
    /// the engine variant tag before touching any section contents.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let parsed = format::read_index(bytes, 7)?;
        if parsed.header.variant != I::VARIANT {
            return Err(IndexError::CorruptIndex(format!(
                "inverted-index variant mismatch: blob was built as {}, engine expects {}",
                parsed.header.variant,
                I::VARIANT
            )));
        }

        let mut trie_r = Reader::new(parsed.sections[0]);
        let trie = CompletionTrie::deserialize(&mut trie_r)?;

        let mut dict_r = Reader::new(parsed.sections[1]);
        let dictionary = FrontCodedDictionary::deserialize(&mut dict_r)?;

        let mut inv_r = Reader::new(parsed.sections[2]);
        let inverted = I::deserialize_from(&mut inv_r)?;

        let mut fwd_r = Reader::new(parsed.sections[3]);
        let forward = ForwardIndex::deserialize(&mut fwd_r)?;

        let mut min_r = Reader::new(parsed.sections[4]);
        let minimal = MinimalDocsList::deserialize(&mut min_r)?;

        let mut scores_r = Reader::new(parsed.sections[5]);
        let scores = FixedWidthVec::deserialize(&mut scores_r)?;

        let mut params_r = Reader::new(parsed.sections[6]);
        let pool_size = params_r.read_u64()? as usize;
        let params = EngineParams {
            max_k: parsed.header.max_k,
            pool_size,
        };

        Ok(Engine::new(
            params, dictionary, trie, inverted, forward, minimal, scores,
        ))
    }
}

/// Concrete engine over uncompressed (plain Elias-Fano) postings.
pub type PlainEngine = Engine<InvertedIndex>;
/// Concrete engine over the block-skipping postings representation.
pub type CompressedEngine = Engine<BlockedInvertedIndex>;

/// One owned result, detached from the engine's result pool. Returned by
/// [`SharedEngine`], whose query methods must release the pool's lock
/// before returning, so the borrowed [`ScoredResult`] the single-threaded
/// `Engine` API hands back won't do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedResult {
    pub score: u32,
    pub text: String,
}

/// A thread-safe façade over one [`Engine`], for callers that want to share
/// a single set of immutable indexes across worker threads instead of
/// giving every thread its own engine. Per §5's concurrency model, the
/// engine's own scratch (the result pool) is exclusive per call; this type
/// is the "wrap the call in a mutex" half of that tradeoff, built on
/// `parking_lot::Mutex` rather than `std::sync::Mutex` for the same
/// uncontended-lock speed the reference crate's own sharing layer favors.
/// Never shares the pool itself — every call holds the lock only long
/// enough to run the query and copy its results out.
#[cfg(feature = "parallel")]
pub struct SharedEngine<I> {
    inner: parking_lot::Mutex<Engine<I>>,
}

#[cfg(feature = "parallel")]
impl<I: InvertedLookup> SharedEngine<I> {
    pub fn new(engine: Engine<I>) -> Self {
        SharedEngine {
            inner: parking_lot::Mutex::new(engine),
        }
    }

    pub fn bytes(&self) -> u64 {
        self.inner.lock().bytes()
    }

    pub fn prefix_topk(&self, query: &str, k: u32) -> Result<Vec<OwnedResult>> {
        let mut guard = self.inner.lock();
        let results = guard
            .prefix_topk(query, k)?
            .map(|r| OwnedResult {
                score: r.score,
                text: r.text.to_string(),
            })
            .collect();
        Ok(results)
    }

    pub fn conjunctive_topk(&self, query: &str, k: u32) -> Result<Vec<OwnedResult>> {
        let mut guard = self.inner.lock();
        let results = guard
            .conjunctive_topk(query, k)?
            .map(|r| OwnedResult {
                score: r.score,
                text: r.text.to_string(),
            })
            .collect();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineParams;

    // The worked corpus from the spec's end-to-end scenarios:
    //   doc 0  score 100  "new york pizza"
    //   doc 1  score  90  "new york times"
    //   doc 2  score  80  "new jersey devils"
    //   doc 3  score  70  "york university"
    fn build_plain_engine() -> PlainEngine {
        let words = [
            "devils",
            "jersey",
            "new",
            "pizza",
            "times",
            "university",
            "york",
        ];
        let mut tokens: Vec<Vec<u8>> = words.iter().map(|s| s.as_bytes().to_vec()).collect();
        tokens.sort();
        let dict = FrontCodedDictionary::build(&tokens);
        let id = |w: &str| dict.locate(w.as_bytes()).unwrap();

        let completions_words = [
            vec!["new", "york", "pizza"],
            vec!["new", "york", "times"],
            vec!["new", "jersey", "devils"],
            vec!["york", "university"],
        ];
        let completions: Vec<Vec<u32>> = completions_words
            .iter()
            .map(|words| words.iter().map(|w| id(w)).collect())
            .collect();

        let trie = CompletionTrie::build(&completions);
        let forward = ForwardIndex::build(&completions, tokens.len() as u32);

        let mut postings = vec![Vec::new(); tokens.len()];
        for (doc_id, ids) in completions.iter().enumerate() {
            for &tok in ids {
                let list = &mut postings[tok as usize];
                if list.last() != Some(&(doc_id as u32)) {
                    list.push(doc_id as u32);
                }
            }
        }
        let inverted = InvertedIndex::build(&postings, completions.len() as u32);
        let minimal = MinimalDocsList::build(&postings, completions.len() as u32);
        let scores = crate::intvec::FixedWidthVec::build(&[100, 90, 80, 70]);

        Engine::new(
            EngineParams::default(),
            dict,
            trie,
            inverted,
            forward,
            minimal,
            scores,
        )
    }

    #[test]
    fn case_a_prefix_new_y() {
        let mut engine = build_plain_engine();
        let docs: Vec<String> = engine
            .prefix_topk("new y", 3)
            .unwrap()
            .map(|r| r.text.to_string())
            .collect();
        assert_eq!(docs, vec!["new york pizza", "new york times"]);
    }

    #[test]
    fn results_carry_the_original_completion_scores() {
        let mut engine = build_plain_engine();
        let scored: Vec<(u32, String)> = engine
            .prefix_topk("new", 2)
            .unwrap()
            .map(|r| (r.score, r.text.to_string()))
            .collect();
        assert_eq!(
            scored,
            vec![
                (100, "new york pizza".to_string()),
                (90, "new york times".to_string()),
            ]
        );
    }

    #[test]
    fn case_b_prefix_new() {
        let mut engine = build_plain_engine();
        let docs: Vec<String> = engine
            .prefix_topk("new", 2)
            .unwrap()
            .map(|r| r.text.to_string())
            .collect();
        assert_eq!(docs, vec!["new york pizza", "new york times"]);
    }

    #[test]
    fn case_c_conjunctive_york() {
        let mut engine = build_plain_engine();
        let docs: Vec<String> = engine
            .conjunctive_topk("york", 3)
            .unwrap()
            .map(|r| r.text.to_string())
            .collect();
        assert_eq!(
            docs,
            vec!["new york pizza", "new york times", "york university"]
        );
    }

    #[test]
    fn case_d_prefix_trailing_space() {
        let mut engine = build_plain_engine();
        let docs: Vec<String> = engine
            .prefix_topk("new york ", 5)
            .unwrap()
            .map(|r| r.text.to_string())
            .collect();
        assert_eq!(docs, vec!["new york pizza", "new york times"]);
    }

    #[test]
    fn case_e_prefix_no_match() {
        let mut engine = build_plain_engine();
        assert_eq!(engine.prefix_topk("z", 5).unwrap().count(), 0);
    }

    #[test]
    fn case_f_conjunctive_york_uni() {
        let mut engine = build_plain_engine();
        let docs: Vec<String> = engine
            .conjunctive_topk("york uni", 2)
            .unwrap()
            .map(|r| r.text.to_string())
            .collect();
        assert_eq!(docs, vec!["york university"]);
    }

    #[test]
    fn empty_query_is_empty() {
        let mut engine = build_plain_engine();
        assert_eq!(engine.prefix_topk("", 5).unwrap().count(), 0);
        assert_eq!(engine.prefix_topk("   ", 5).unwrap().count(), 0);
    }

    #[test]
    fn k_zero_is_empty() {
        let mut engine = build_plain_engine();
        assert_eq!(engine.prefix_topk("new", 0).unwrap().count(), 0);
    }

    #[test]
    fn k_over_max_is_invalid_query() {
        let mut engine = build_plain_engine();
        let err = engine.prefix_topk("new", 1000).err().unwrap();
        assert!(matches!(err, IndexError::InvalidQuery(_)));
    }

    #[test]
    fn result_pool_stops_at_its_byte_budget() {
        // "new york pizza" is 14 bytes; a pool with room for exactly one
        // result should silently drop the rest rather than overflow.
        let mut engine = build_plain_engine();
        engine.params.pool_size = 14;
        engine.pool.capacity = 14;
        let docs: Vec<String> = engine
            .prefix_topk("new", 2)
            .unwrap()
            .map(|r| r.text.to_string())
            .collect();
        assert_eq!(docs, vec!["new york pizza"]);
    }

    #[test]
    fn result_pool_is_idempotent_across_calls() {
        let mut engine = build_plain_engine();
        let first: Vec<(u32, String)> = engine
            .prefix_topk("new", 2)
            .unwrap()
            .map(|r| (r.score, r.text.to_string()))
            .collect();
        let second: Vec<(u32, String)> = engine
            .prefix_topk("new", 2)
            .unwrap()
            .map(|r| (r.score, r.text.to_string()))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn engine_saves_and_loads_round_trip() {
        let mut engine = build_plain_engine();
        let mut bytes = Vec::new();
        engine.save(&mut bytes).unwrap();

        let mut loaded = PlainEngine::load(&bytes).unwrap();
        let docs: Vec<String> = loaded
            .prefix_topk("new y", 3)
            .unwrap()
            .map(|r| r.text.to_string())
            .collect();
        assert_eq!(docs, vec!["new york pizza", "new york times"]);
    }

    #[test]
    fn engine_load_rejects_corrupted_bytes() {
        let engine = build_plain_engine();
        let mut bytes = Vec::new();
        engine.save(&mut bytes).unwrap();
        let flip = bytes.len() / 2;
        bytes[flip] ^= 0xFF;
        assert!(matches!(
            PlainEngine::load(&bytes),
            Err(IndexError::CorruptIndex(_))
        ));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn shared_engine_serves_concurrent_queries() {
        use std::sync::Arc;

        let shared = Arc::new(SharedEngine::new(build_plain_engine()));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        shared.prefix_topk("new", 2).unwrap()
                    } else {
                        shared.conjunctive_topk("york", 3).unwrap()
                    }
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let results = handle.join().unwrap();
            if i % 2 == 0 {
                assert_eq!(
                    results,
                    vec![
                        OwnedResult {
                            score: 100,
                            text: "new york pizza".to_string()
                        },
                        OwnedResult {
                            score: 90,
                            text: "new york times".to_string()
                        },
                    ]
                );
            } else {
                assert_eq!(results.len(), 3);
            }
        }
    }
}
