// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Low-level framing primitives for the persisted binary format: a
//! length-prefixed integer/byte writer and a bounds-checked reader, plus the
//! header/footer/section-table layout described in the persisted-format
//! component.
//!
//! Every component serializes its own raw integer arrays, each prefixed with
//! an 8-byte length field (`write_u32_vec`/`write_u64_vec`/`write_bytes`);
//! there is no varint compression in this layer, since the wire format
//! favors O(1) section parsing over smaller files. The header carries a
//! fixed-size `SectionOffsets` table computed once at write time, so readers
//! never recompute layout from component internals — the same source of
//! truth pattern the reference crate's `SectionOffsets` uses.

use std::io::{self, Write};

use crc32fast::Hasher as Crc32Hasher;

use crate::error::{IndexError, Result};

/// Magic bytes identifying a persisted index blob: "ACPL" (aut**o**c**o**mpletion).
pub const MAGIC: [u8; 4] = *b"ACPL";

/// Current on-disk format version. Bumped on any layout-incompatible change.
pub const VERSION: u32 = 1;

/// Tags the inverted-index representation a blob was built with, so `query`
/// can pick the right concrete engine type without re-deriving it from the
/// bytes themselves.
pub const VARIANT_PLAIN: u8 = 0;
pub const VARIANT_BLOCKED: u8 = 1;

// ============================================================================
// WRITE PRIMITIVES
// ============================================================================

pub(crate) fn write_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub(crate) fn write_u64(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub(crate) fn write_u32_vec(buf: &mut Vec<u8>, values: &[u32]) {
    write_u64(buf, values.len() as u64);
    for &v in values {
        write_u32(buf, v);
    }
}

pub(crate) fn write_u64_vec(buf: &mut Vec<u8>, values: &[u64]) {
    write_u64(buf, values.len() as u64);
    for &v in values {
        write_u64(buf, v);
    }
}

pub(crate) fn write_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    write_u64(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Length-prefixes `body`'s own bytes, so a reader can skip a whole section
/// without decoding it (used to frame each top-level section).
pub(crate) fn write_section(buf: &mut Vec<u8>, body: &[u8]) {
    write_bytes(buf, body);
}

// ============================================================================
// READ PRIMITIVES
// ============================================================================

/// Sane upper bound on any single length field. Declared sizes above this
/// are treated as corruption rather than an allocation attempt: a build
/// input with a legitimate few-hundred-million-element vector is plausible,
/// but nothing in this crate's domain approaches a full `u64` range.
const MAX_DECLARED_LEN: u64 = 1 << 34;

/// Bounds-checked cursor over a persisted index's bytes. Every `read_*`
/// method returns `CorruptIndex` rather than panicking on truncated or
/// adversarially large length fields.
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.bytes.len() {
            return Err(IndexError::CorruptIndex(format!(
                "unexpected end of index data at byte {} (need {} more)",
                self.pos, n
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let slice = self.take(4)?;
        Ok(u32::from_le_bytes(slice.try_into().unwrap()))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let slice = self.take(8)?;
        Ok(u64::from_le_bytes(slice.try_into().unwrap()))
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_len(&mut self) -> Result<usize> {
        let n = self.read_u64()?;
        if n > MAX_DECLARED_LEN {
            return Err(IndexError::CorruptIndex(format!(
                "declared length {n} exceeds sanity bound"
            )));
        }
        Ok(n as usize)
    }

    pub fn read_u32_vec(&mut self) -> Result<Vec<u32>> {
        let n = self.read_len()?;
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.read_u32()?);
        }
        Ok(out)
    }

    pub fn read_u64_vec(&mut self) -> Result<Vec<u64>> {
        let n = self.read_len()?;
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.read_u64()?);
        }
        Ok(out)
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let n = self.read_len()?;
        Ok(self.take(n)?.to_vec())
    }

    /// Reads one length-prefixed section's raw bytes without decoding them,
    /// for dispatching each section to its own component deserializer.
    pub fn read_section(&mut self) -> Result<&'a [u8]> {
        let n = self.read_len()?;
        self.take(n)
    }
}

// ============================================================================
// HEADER / FOOTER
// ============================================================================

/// Fixed-size header: magic, version, the two build-time tunables baked
/// into this specific blob, the engine variant, and the three top-level
/// counts. Written before any section so a reader can validate the whole
/// thing in one bounded read before touching section data.
#[derive(Debug, Clone, Copy)]
pub struct IndexHeader {
    pub version: u32,
    pub bucket_size: u32,
    pub max_k: u32,
    pub variant: u8,
    pub num_docs: u64,
    pub num_tokens: u64,
    pub num_terms: u64,
}

impl IndexHeader {
    fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&MAGIC);
        write_u32(buf, self.version);
        write_u32(buf, self.bucket_size);
        write_u32(buf, self.max_k);
        buf.push(self.variant);
        buf.extend_from_slice(&[0u8; 3]); // reserved, keeps the header 8-byte aligned
        write_u64(buf, self.num_docs);
        write_u64(buf, self.num_tokens);
        write_u64(buf, self.num_terms);
    }

    fn read(r: &mut Reader) -> Result<Self> {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&r.take(4)?[..4]);
        if magic != MAGIC {
            return Err(IndexError::CorruptIndex(format!(
                "bad magic: expected {MAGIC:?}, found {magic:?}"
            )));
        }
        let version = r.read_u32()?;
        if version != VERSION {
            return Err(IndexError::CorruptIndex(format!(
                "unsupported format version {version} (expected {VERSION})"
            )));
        }
        let bucket_size = r.read_u32()?;
        let max_k = r.read_u32()?;
        let variant = r.read_u8()?;
        r.take(3)?; // reserved
        let num_docs = r.read_u64()?;
        let num_tokens = r.read_u64()?;
        let num_terms = r.read_u64()?;
        Ok(IndexHeader {
            version,
            bucket_size,
            max_k,
            variant,
            num_docs,
            num_tokens,
            num_terms,
        })
    }
}

const FOOTER_SIZE: usize = 8; // crc32 (u32) + repeated magic

/// Assembles a complete persisted blob from already-serialized section
/// bodies, in the fixed visitor order (completion trie — which carries its
/// own unsorted docs list as a nested section — minimal docs list,
/// dictionary, inverted index, forward index), and writes it to `w`.
pub(crate) fn write_index<W: Write>(
    w: &mut W,
    header: IndexHeader,
    sections: &[&[u8]],
) -> Result<()> {
    let mut buf = Vec::new();
    header.write(&mut buf);
    for section in sections {
        write_section(&mut buf, section);
    }
    let crc = {
        let mut hasher = Crc32Hasher::new();
        hasher.update(&buf);
        hasher.finalize()
    };
    write_u32(&mut buf, crc);
    buf.extend_from_slice(&MAGIC);
    w.write_all(&buf).map_err(IndexError::from)
}

/// Result of validating and framing a persisted blob: the parsed header and
/// the six (here, five — see module docs) section slices in visitor order.
pub(crate) struct ParsedIndex<'a> {
    pub header: IndexHeader,
    pub sections: Vec<&'a [u8]>,
}

/// Validates the footer (magic, CRC32) and decodes just the fixed-size
/// header, without touching section data. Lets a caller that doesn't yet
/// know which engine variant a blob holds (e.g. the CLI) branch on
/// [`IndexHeader::variant`] before committing to a full `read_index`.
pub fn peek_header(bytes: &[u8]) -> Result<IndexHeader> {
    if bytes.len() < FOOTER_SIZE {
        return Err(IndexError::CorruptIndex(
            "index blob shorter than the footer alone".into(),
        ));
    }
    let content_len = bytes.len() - FOOTER_SIZE;
    let footer_magic = &bytes[content_len + 4..];
    if footer_magic != MAGIC {
        return Err(IndexError::CorruptIndex(
            "footer magic mismatch: truncated or corrupted index".into(),
        ));
    }
    let declared_crc = u32::from_le_bytes(bytes[content_len..content_len + 4].try_into().unwrap());
    let actual_crc = {
        let mut hasher = Crc32Hasher::new();
        hasher.update(&bytes[..content_len]);
        hasher.finalize()
    };
    if declared_crc != actual_crc {
        return Err(IndexError::CorruptIndex(format!(
            "CRC32 mismatch: declared {declared_crc:#010x}, computed {actual_crc:#010x}"
        )));
    }
    let mut r = Reader::new(&bytes[..content_len]);
    IndexHeader::read(&mut r)
}

/// Validates structural integrity (magic, version, declared-vs-actual size,
/// CRC32) and splits `bytes` into its header and `num_sections` section
/// slices. Any failure here is `CorruptIndex`; no partial result is ever
/// returned.
pub(crate) fn read_index(bytes: &[u8], num_sections: usize) -> Result<ParsedIndex<'_>> {
    if bytes.len() < FOOTER_SIZE {
        return Err(IndexError::CorruptIndex(
            "index blob shorter than the footer alone".into(),
        ));
    }
    let content_len = bytes.len() - FOOTER_SIZE;
    let footer_magic = &bytes[content_len + 4..];
    if footer_magic != MAGIC {
        return Err(IndexError::CorruptIndex(
            "footer magic mismatch: truncated or corrupted index".into(),
        ));
    }
    let declared_crc = u32::from_le_bytes(bytes[content_len..content_len + 4].try_into().unwrap());
    let actual_crc = {
        let mut hasher = Crc32Hasher::new();
        hasher.update(&bytes[..content_len]);
        hasher.finalize()
    };
    if declared_crc != actual_crc {
        return Err(IndexError::CorruptIndex(format!(
            "CRC32 mismatch: declared {declared_crc:#010x}, computed {actual_crc:#010x}"
        )));
    }

    let mut r = Reader::new(&bytes[..content_len]);
    let header = IndexHeader::read(&mut r)?;
    let mut sections = Vec::with_capacity(num_sections);
    for _ in 0..num_sections {
        sections.push(r.read_section()?);
    }
    if r.position() != content_len {
        return Err(IndexError::CorruptIndex(format!(
            "{} trailing bytes after declared sections",
            content_len - r.position()
        )));
    }
    Ok(ParsedIndex { header, sections })
}

/// Reads an entire file into memory. Thin wrapper so build/query code in
/// `main.rs` doesn't duplicate the `fs::read` + error-mapping boilerplate.
pub fn read_file(path: &std::path::Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(IndexError::from)
}

/// Opens `path` for writing, truncating any existing content.
pub fn create_file(path: &std::path::Path) -> io::Result<std::fs::File> {
    std::fs::File::create(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let header = IndexHeader {
            version: VERSION,
            bucket_size: 16,
            max_k: 15,
            variant: VARIANT_PLAIN,
            num_docs: 4,
            num_tokens: 7,
            num_terms: 7,
        };
        let mut buf = Vec::new();
        header.write(&mut buf);
        let mut r = Reader::new(&buf);
        let parsed = IndexHeader::read(&mut r).unwrap();
        assert_eq!(parsed.bucket_size, 16);
        assert_eq!(parsed.num_docs, 4);
        assert_eq!(parsed.variant, VARIANT_PLAIN);
    }

    #[test]
    fn write_then_read_index_round_trips_sections() {
        let header = IndexHeader {
            version: VERSION,
            bucket_size: 16,
            max_k: 15,
            variant: VARIANT_PLAIN,
            num_docs: 1,
            num_tokens: 1,
            num_terms: 1,
        };
        let sections: Vec<Vec<u8>> = vec![vec![1, 2, 3], vec![], vec![9, 9]];
        let refs: Vec<&[u8]> = sections.iter().map(|s| s.as_slice()).collect();
        let mut out = Vec::new();
        write_index(&mut out, header, &refs).unwrap();

        let parsed = read_index(&out, 3).unwrap();
        assert_eq!(parsed.header.num_docs, 1);
        assert_eq!(parsed.sections[0], &[1, 2, 3][..]);
        assert_eq!(parsed.sections[1], &[][..]);
        assert_eq!(parsed.sections[2], &[9, 9][..]);
    }

    #[test]
    fn truncated_blob_is_corrupt_index() {
        let header = IndexHeader {
            version: VERSION,
            bucket_size: 16,
            max_k: 15,
            variant: VARIANT_PLAIN,
            num_docs: 0,
            num_tokens: 0,
            num_terms: 0,
        };
        let mut out = Vec::new();
        write_index(&mut out, header, &[&[1, 2, 3]]).unwrap();
        out.truncate(out.len() - 4);
        assert!(matches!(read_index(&out, 1), Err(IndexError::CorruptIndex(_))));
    }

    #[test]
    fn bit_flip_is_detected_by_crc() {
        let header = IndexHeader {
            version: VERSION,
            bucket_size: 16,
            max_k: 15,
            variant: VARIANT_PLAIN,
            num_docs: 0,
            num_tokens: 0,
            num_terms: 0,
        };
        let mut out = Vec::new();
        write_index(&mut out, header, &[&[1, 2, 3, 4, 5]]).unwrap();
        let flip_pos = out.len() / 2;
        out[flip_pos] ^= 0x01;
        assert!(matches!(read_index(&out, 1), Err(IndexError::CorruptIndex(_))));
    }

    #[test]
    fn bad_magic_is_corrupt_index() {
        let mut out = vec![0u8; 64];
        assert!(matches!(read_index(&out, 1), Err(IndexError::CorruptIndex(_))));
        out[0] = b'A';
        assert!(matches!(read_index(&out, 1), Err(IndexError::CorruptIndex(_))));
    }
}
