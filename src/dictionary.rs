// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Front-coded string dictionary: the bidirectional mapping between token
//! strings and dense, lexicographically-ordered token ids.
//!
//! Tokens are partitioned into fixed-size buckets ([`BUCKET_SIZE`](crate::config::BUCKET_SIZE)).
//! The first token of a bucket (the "header") is stored verbatim; every
//! other token is stored as `(lcp, suffix, 0x00)` relative to its
//! predecessor, where `lcp` is the length of the shared prefix with the
//! previous token. This keeps the whole vocabulary a single contiguous byte
//! buffer with O(B) reconstruction cost per token.

use crate::config::BUCKET_SIZE;
use crate::error::Result;
use crate::format::{write_bytes, write_u32_vec, write_u64, Reader};

const NOT_FOUND: u32 = u32::MAX;

/// A lex-sorted, front-coded vocabulary of byte-string tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontCodedDictionary {
    /// Concatenated bucket bodies: header bytes verbatim, then for each
    /// subsequent token one byte of LCP length, its suffix bytes, then a
    /// `0x00` terminator.
    data: Vec<u8>,
    /// Byte offset into `data` where each bucket body begins.
    bucket_offsets: Vec<u32>,
    /// Byte length of each bucket's header token, needed to know where the
    /// coded tail begins.
    header_lens: Vec<u32>,
    num_tokens: usize,
}

impl FrontCodedDictionary {
    /// Builds a dictionary from tokens already sorted in strictly
    /// increasing lexicographic order. Panics (a build-time, not a query-time,
    /// contract) if `tokens` is not sorted or contains duplicates.
    pub fn build(tokens: &[Vec<u8>]) -> Self {
        debug_assert!(
            tokens.windows(2).all(|w| w[0] < w[1]),
            "dictionary tokens must be strictly increasing"
        );
        let mut data = Vec::new();
        let mut bucket_offsets = Vec::new();
        let mut header_lens = Vec::new();

        for bucket in tokens.chunks(BUCKET_SIZE) {
            bucket_offsets.push(data.len() as u32);
            let header = &bucket[0];
            header_lens.push(header.len() as u32);
            data.extend_from_slice(header);

            let mut prev: &[u8] = header;
            for tok in &bucket[1..] {
                let lcp = common_prefix_len(prev, tok);
                debug_assert!(lcp <= 255, "front-coded lcp must fit in one byte");
                data.push(lcp as u8);
                data.extend_from_slice(&tok[lcp..]);
                data.push(0u8);
                prev = tok;
            }
        }

        FrontCodedDictionary {
            data,
            bucket_offsets,
            header_lens,
            num_tokens: tokens.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.num_tokens
    }

    pub fn is_empty(&self) -> bool {
        self.num_tokens == 0
    }

    fn num_buckets(&self) -> usize {
        self.bucket_offsets.len()
    }

    /// Reconstructs every token in bucket `b`, calling `f(local_idx, bytes)`
    /// for each. Stops early if `f` returns `false`.
    fn walk_bucket(&self, b: usize, mut f: impl FnMut(usize, &[u8]) -> bool) {
        let start = self.bucket_offsets[b] as usize;
        let header_len = self.header_lens[b] as usize;
        let mut cursor = start + header_len;
        let mut prev = self.data[start..cursor].to_vec();
        if !f(0, &prev) {
            return;
        }
        let bucket_size = self.bucket_len(b);
        for local in 1..bucket_size {
            let lcp = self.data[cursor] as usize;
            cursor += 1;
            let suffix_start = cursor;
            while self.data[cursor] != 0 {
                cursor += 1;
            }
            let mut tok = prev[..lcp].to_vec();
            tok.extend_from_slice(&self.data[suffix_start..cursor]);
            cursor += 1; // skip terminator
            if !f(local, &tok) {
                return;
            }
            prev = tok;
        }
    }

    fn bucket_len(&self, b: usize) -> usize {
        let total = self.num_tokens;
        let full = total / BUCKET_SIZE;
        if b < full {
            BUCKET_SIZE
        } else {
            total - full * BUCKET_SIZE
        }
    }

    /// Reconstructs the string for `id`. `id` must be `< len()`; out-of-range
    /// access is a programmer error (the caller owns the contract of only
    /// querying ids handed back by `locate`/`locate_prefix`).
    pub fn extract(&self, id: u32) -> Vec<u8> {
        debug_assert!((id as usize) < self.num_tokens, "token id out of range");
        let b = id as usize / BUCKET_SIZE;
        let local_target = id as usize % BUCKET_SIZE;
        let mut result = Vec::new();
        self.walk_bucket(b, |local, bytes| {
            if local == local_target {
                result = bytes.to_vec();
                false
            } else {
                true
            }
        });
        result
    }

    fn bucket_header(&self, b: usize) -> &[u8] {
        let start = self.bucket_offsets[b] as usize;
        let len = self.header_lens[b] as usize;
        &self.data[start..start + len]
    }

    /// Binary search over bucket headers for the last bucket whose header is
    /// `<= key`. Returns `None` if `key` is lexicographically before every
    /// header (i.e. would only ever be findable in bucket 0, or not at all).
    fn bucket_search(&self, key: &[u8]) -> usize {
        let mut lo = 0usize;
        let mut hi = self.num_buckets();
        while lo + 1 < hi {
            let mid = lo + (hi - lo) / 2;
            if self.bucket_header(mid) <= key {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Exact lookup: returns the token id for `key`, or `NOT_FOUND` (as
    /// `u32::MAX`) if absent.
    pub fn locate(&self, key: &[u8]) -> Option<u32> {
        if self.is_empty() {
            return None;
        }
        let b = self.bucket_search(key);
        let mut found = NOT_FOUND;
        self.walk_bucket(b, |local, bytes| {
            if bytes == key {
                found = (b * BUCKET_SIZE + local) as u32;
                false
            } else {
                bytes < key
            }
        });
        if found == NOT_FOUND {
            None
        } else {
            Some(found)
        }
    }

    /// Range of ids `[lo, hi)` whose tokens start with `prefix`. Empty
    /// (`lo == hi`) if no token matches.
    pub fn locate_prefix(&self, prefix: &[u8]) -> (u32, u32) {
        if self.is_empty() || prefix.is_empty() {
            return (0, self.num_tokens as u32);
        }
        let lo = self.first_with_prefix(prefix);
        let hi = self.first_at_or_after_prefix_end(prefix);
        (lo, hi)
    }

    /// Smallest id whose token has `prefix` as a prefix, or `num_tokens` if
    /// none does (scanning must start from the bucket that could contain it).
    fn first_with_prefix(&self, prefix: &[u8]) -> u32 {
        // The first bucket that could contain a token >= prefix: a normal
        // bucket_search on `prefix` lands on the bucket whose header is <=
        // prefix, but the match itself might be a few tokens (or one bucket)
        // later, so walk forward from there.
        let start_bucket = self.bucket_search(prefix);
        for b in start_bucket..self.num_buckets() {
            let mut found: Option<u32> = None;
            let mut overshoot = false;
            self.walk_bucket(b, |local, bytes| {
                if bytes.starts_with(prefix) {
                    found = Some((b * BUCKET_SIZE + local) as u32);
                    false
                } else if bytes.as_ref() as &[u8] > prefix && !starts_before(bytes, prefix) {
                    overshoot = true;
                    false
                } else {
                    true
                }
            });
            if let Some(id) = found {
                return id;
            }
            if overshoot {
                return self.num_tokens as u32;
            }
        }
        self.num_tokens as u32
    }

    /// Smallest id whose token no longer has `prefix` as a prefix, scanning
    /// forward from the first match (the exclusive upper bound of the
    /// prefix range).
    fn first_at_or_after_prefix_end(&self, prefix: &[u8]) -> u32 {
        let lo = self.first_with_prefix(prefix);
        if lo as usize == self.num_tokens {
            return lo;
        }
        let start_bucket = lo as usize / BUCKET_SIZE;
        for b in start_bucket..self.num_buckets() {
            let mut result: Option<u32> = None;
            self.walk_bucket(b, |local, bytes| {
                let id = (b * BUCKET_SIZE + local) as u32;
                if id < lo {
                    return true;
                }
                if !bytes.starts_with(prefix) {
                    result = Some(id);
                    false
                } else {
                    true
                }
            });
            if let Some(id) = result {
                return id;
            }
        }
        self.num_tokens as u32
    }

    pub fn size_in_bytes(&self) -> usize {
        self.data.len()
            + self.bucket_offsets.len() * 4
            + self.header_lens.len() * 4
            + 24
    }

    pub(crate) fn serialize(&self, buf: &mut Vec<u8>) {
        write_u64(buf, self.num_tokens as u64);
        write_bytes(buf, &self.data);
        write_u32_vec(buf, &self.bucket_offsets);
        write_u32_vec(buf, &self.header_lens);
    }

    pub(crate) fn deserialize(r: &mut Reader) -> Result<Self> {
        let num_tokens = r.read_u64()? as usize;
        let data = r.read_bytes()?;
        let bucket_offsets = r.read_u32_vec()?;
        let header_lens = r.read_u32_vec()?;
        Ok(FrontCodedDictionary {
            data,
            bucket_offsets,
            header_lens,
            num_tokens,
        })
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// True if `bytes` is lexicographically less than `prefix` when compared
/// only up to `bytes`'s own length (i.e. `bytes` could still be extended to
/// carry `prefix`, it just hasn't been reached yet in sort order).
fn starts_before(bytes: &[u8], prefix: &[u8]) -> bool {
    bytes < &prefix[..bytes.len().min(prefix.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<Vec<u8>> {
        let mut v: Vec<Vec<u8>> = words.iter().map(|s| s.as_bytes().to_vec()).collect();
        v.sort();
        v.dedup();
        v
    }

    #[test]
    fn extract_round_trips_every_token() {
        let words = [
            "devils", "jersey", "new", "pizza", "times", "university", "york",
        ];
        let tokens = toks(&words);
        let dict = FrontCodedDictionary::build(&tokens);
        for (id, tok) in tokens.iter().enumerate() {
            assert_eq!(dict.extract(id as u32), *tok);
        }
    }

    #[test]
    fn locate_finds_exact_tokens() {
        let words = ["aa", "ab", "abc", "abd", "b", "ba", "z"];
        let tokens = toks(&words);
        let dict = FrontCodedDictionary::build(&tokens);
        for (id, tok) in tokens.iter().enumerate() {
            assert_eq!(dict.locate(tok), Some(id as u32));
        }
        assert_eq!(dict.locate(b"missing"), None);
    }

    #[test]
    fn locate_prefix_covers_matching_range() {
        let words = ["aa", "ab", "abc", "abd", "b", "ba", "z"];
        let tokens = toks(&words);
        let dict = FrontCodedDictionary::build(&tokens);
        let (lo, hi) = dict.locate_prefix(b"ab");
        let matched: Vec<_> = (lo..hi).map(|id| dict.extract(id)).collect();
        assert_eq!(
            matched,
            vec![b"ab".to_vec(), b"abc".to_vec(), b"abd".to_vec()]
        );
        let (lo, hi) = dict.locate_prefix(b"z");
        assert_eq!((lo, hi), (6, 7));
        let (lo, hi) = dict.locate_prefix(b"missing");
        assert_eq!(lo, hi);
    }

    #[test]
    fn locate_prefix_spans_many_buckets() {
        let words: Vec<String> = (0..500).map(|i| format!("tok{i:04}")).collect();
        let refs: Vec<&str> = words.iter().map(|s| s.as_str()).collect();
        let tokens = toks(&refs);
        let dict = FrontCodedDictionary::build(&tokens);
        let (lo, hi) = dict.locate_prefix(b"tok01");
        for id in lo..hi {
            assert!(dict.extract(id).starts_with(b"tok01"));
        }
        assert_eq!((hi - lo) as usize, 100);
    }

    #[test]
    fn dictionary_serializes_round_trip() {
        let words = ["aa", "ab", "abc", "abd", "b", "ba", "z"];
        let tokens = toks(&words);
        let dict = FrontCodedDictionary::build(&tokens);
        let mut buf = Vec::new();
        dict.serialize(&mut buf);
        let mut r = Reader::new(&buf);
        let back = FrontCodedDictionary::deserialize(&mut r).unwrap();
        assert_eq!(back, dict);
        for (id, tok) in tokens.iter().enumerate() {
            assert_eq!(back.extract(id as u32), *tok);
        }
    }
}
