// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Build pipeline: parses the external tokenizer's flat-file input for one
//! index family and constructs the full set of in-memory structures, ready
//! to be handed to [`crate::engine::Engine::save`].
//!
//! Progress is reported phase-by-phase on stderr, with an `indicatif` bar
//! per phase behind the `parallel` feature — the same gating the reference
//! crate's own build pipeline uses, so a non-parallel build still works, it
//! just prints less.

use std::fs;
use std::path::Path;

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::EngineParams;
use crate::dictionary::FrontCodedDictionary;
use crate::engine::{Engine, InvertedLookup, InvertedStorage};
use crate::error::{IndexError, Result};
use crate::forward::ForwardIndex;
use crate::inverted::{BlockedInvertedIndex, InvertedIndex};
use crate::minimal::MinimalDocsList;
use crate::trie::CompletionTrie;

/// Everything parsed out of one basename's five input files, before any
/// structure is built.
struct ParsedInput {
    tokens: Vec<Vec<u8>>,
    completions: Vec<Vec<u32>>,
    scores: Vec<u32>,
    inverted_postings: Vec<Vec<u32>>,
    forward_postings: Vec<Vec<u32>>,
    minimal_postings: Vec<Vec<u32>>,
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(IndexError::from)?;
    Ok(content.lines().map(str::to_owned).collect())
}

fn parse_header_count(line: Option<&String>, what: &str) -> Result<usize> {
    line.ok_or_else(|| IndexError::IoError(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, format!("missing {what} header"))))?
        .trim()
        .parse::<usize>()
        .map_err(|e| IndexError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, format!("bad {what} header: {e}"))))
}

fn parse_postings_section(lines: &[String], what: &str) -> Result<Vec<Vec<u32>>> {
    let num_terms = parse_header_count(lines.first(), what)?;
    let mut out = Vec::with_capacity(num_terms);
    for line in lines.iter().skip(1).take(num_terms) {
        let mut parts = line.split_whitespace();
        let len: usize = parts
            .next()
            .ok_or_else(|| invalid(what, "missing length field"))?
            .parse()
            .map_err(|_| invalid(what, "non-numeric length field"))?;
        let ids: Vec<u32> = parts
            .map(|p| p.parse::<u32>().map_err(|_| invalid(what, "non-numeric id")))
            .collect::<Result<_>>()?;
        if ids.len() != len {
            return Err(invalid(what, "declared length does not match id count"));
        }
        out.push(ids);
    }
    if out.len() != num_terms {
        return Err(invalid(what, "fewer rows than the declared count"));
    }
    Ok(out)
}

fn invalid(what: &str, msg: &str) -> IndexError {
    IndexError::IoError(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("{what}: {msg}"),
    ))
}

fn parse_dict(lines: &[String]) -> Result<Vec<Vec<u8>>> {
    let num_tokens = parse_header_count(lines.first(), ".dict")?;
    let tokens: Vec<Vec<u8>> = lines
        .iter()
        .skip(1)
        .take(num_tokens)
        .map(|l| l.as_bytes().to_vec())
        .collect();
    if tokens.len() != num_tokens {
        return Err(invalid(".dict", "fewer tokens than the declared count"));
    }
    if !tokens.windows(2).all(|w| w[0] < w[1]) {
        return Err(invalid(".dict", "tokens are not strictly increasing"));
    }
    Ok(tokens)
}

fn parse_completions(
    lines: &[String],
    dict: &FrontCodedDictionary,
) -> Result<(Vec<Vec<u32>>, Vec<u32>)> {
    let mut out = Vec::with_capacity(lines.len());
    let mut scores = Vec::with_capacity(lines.len());
    let mut prev_score: Option<u32> = None;
    for line in lines {
        let mut parts = line.split_whitespace();
        let score: u32 = parts
            .next()
            .ok_or_else(|| invalid(".completions", "missing score field"))?
            .parse()
            .map_err(|_| invalid(".completions", "non-numeric score"))?;
        if let Some(prev) = prev_score {
            if score > prev {
                return Err(invalid(".completions", "scores are not in descending order"));
            }
        }
        prev_score = Some(score);
        let mut ids = Vec::new();
        for tok in parts {
            let id = dict
                .locate(tok.as_bytes())
                .ok_or_else(|| invalid(".completions", "token not present in dictionary"))?;
            ids.push(id);
        }
        out.push(ids);
        scores.push(score);
    }
    Ok((out, scores))
}

fn sibling_path(basename: &str, ext: &str) -> std::path::PathBuf {
    std::path::PathBuf::from(format!("{basename}.{ext}"))
}

fn parse_input(basename: &str) -> Result<ParsedInput> {
    let dict_lines = read_lines(&sibling_path(basename, "dict"))?;
    let tokens = parse_dict(&dict_lines)?;
    let dict = FrontCodedDictionary::build(&tokens);

    let completion_lines = read_lines(&sibling_path(basename, "completions"))?;
    let (completions, scores) = parse_completions(&completion_lines, &dict)?;

    let inverted_lines = read_lines(&sibling_path(basename, "inverted"))?;
    let inverted_postings = parse_postings_section(&inverted_lines, ".inverted")?;

    let forward_lines = read_lines(&sibling_path(basename, "forward"))?;
    let forward_postings = parse_postings_section(&forward_lines, ".forward")?;

    let minimal_lines = read_lines(&sibling_path(basename, "mapped_minimal"))?;
    let minimal_postings = parse_postings_section(&minimal_lines, ".mapped_minimal")?;
    if minimal_postings.len() != tokens.len() {
        return Err(invalid(
            ".mapped_minimal",
            "postings-list count does not match the dictionary's token count",
        ));
    }

    Ok(ParsedInput {
        tokens,
        completions,
        scores,
        inverted_postings,
        forward_postings,
        minimal_postings,
    })
}

#[cfg(feature = "parallel")]
fn phase_bar(len: u64, prefix: &'static str) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:<10} [{bar:32.cyan/dim}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );
    bar.set_prefix(prefix);
    bar
}

fn format_bytes(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

/// Builds a [`crate::engine::PlainEngine`] from `<basename>.{dict,completions,inverted,forward,mapped_minimal}`.
pub fn build_plain(basename: &str, params: EngineParams) -> Result<crate::engine::PlainEngine> {
    build_with(basename, params, InvertedIndex::build)
}

/// Builds a [`crate::engine::CompressedEngine`] from the same five input
/// files, using the block-skipping postings representation instead.
pub fn build_compressed(
    basename: &str,
    params: EngineParams,
) -> Result<crate::engine::CompressedEngine> {
    build_with(basename, params, |postings, _num_docs| {
        BlockedInvertedIndex::build(postings)
    })
}

fn build_with<I>(
    basename: &str,
    params: EngineParams,
    build_inverted: impl FnOnce(&[Vec<u32>], u32) -> I + MaybeSend,
) -> Result<Engine<I>>
where
    I: InvertedLookup + InvertedStorage + MaybeSend,
{
    eprintln!("parsing {basename}.{{dict,completions,inverted,forward,mapped_minimal}}");
    #[cfg(feature = "parallel")]
    let parse_bar = phase_bar(5, "Parsing");
    let parsed = parse_input(basename)?;
    #[cfg(feature = "parallel")]
    parse_bar.finish_with_message("done");

    let num_docs = parsed.completions.len() as u32;

    eprintln!("building dictionary, trie, inverted/forward/minimal indexes");
    #[cfg(feature = "parallel")]
    let build_bar = phase_bar(5, "Building");

    let (dictionary, trie, inverted, forward, minimal) =
        build_structures(&parsed, num_docs, build_inverted);

    #[cfg(feature = "parallel")]
    {
        build_bar.inc(5);
        build_bar.finish_with_message("done");
    }

    let scores = crate::intvec::FixedWidthVec::build(
        &parsed.scores.iter().map(|&s| s as u64).collect::<Vec<_>>(),
    );
    let engine = Engine::new(params, dictionary, trie, inverted, forward, minimal, scores);
    eprintln!(
        "build complete: {} documents, {} bytes in memory",
        num_docs,
        format_bytes(engine.bytes())
    );
    Ok(engine)
}

/// `Send` under the `parallel` feature (the five structures below are built
/// concurrently via `rayon::join`), a no-op bound otherwise.
#[cfg(feature = "parallel")]
trait MaybeSend: Send {}
#[cfg(feature = "parallel")]
impl<T: Send> MaybeSend for T {}
#[cfg(not(feature = "parallel"))]
trait MaybeSend {}
#[cfg(not(feature = "parallel"))]
impl<T> MaybeSend for T {}

/// Builds the five independent structures (dictionary, trie, inverted,
/// forward, minimal) from one parsed input. Each depends only on `parsed`
/// and `num_docs`, never on another of these five, so the `parallel`
/// feature builds all of them concurrently via nested `rayon::join` rather
/// than the mostly-idle single-threaded chain below.
#[cfg(feature = "parallel")]
fn build_structures<I: Send>(
    parsed: &ParsedInput,
    num_docs: u32,
    build_inverted: impl FnOnce(&[Vec<u32>], u32) -> I + Send,
) -> (
    FrontCodedDictionary,
    CompletionTrie,
    I,
    ForwardIndex,
    MinimalDocsList,
) {
    let (dictionary, (trie, (inverted, (forward, minimal)))) = rayon::join(
        || FrontCodedDictionary::build(&parsed.tokens),
        || {
            rayon::join(
                || CompletionTrie::build(&parsed.completions),
                || {
                    rayon::join(
                        || build_inverted(&parsed.inverted_postings, num_docs.max(1)),
                        || {
                            rayon::join(
                                || {
                                    ForwardIndex::build(
                                        &parsed.forward_postings,
                                        parsed.tokens.len() as u32,
                                    )
                                },
                                || MinimalDocsList::build(&parsed.minimal_postings, num_docs),
                            )
                        },
                    )
                },
            )
        },
    );
    (dictionary, trie, inverted, forward, minimal)
}

#[cfg(not(feature = "parallel"))]
fn build_structures<I>(
    parsed: &ParsedInput,
    num_docs: u32,
    build_inverted: impl FnOnce(&[Vec<u32>], u32) -> I,
) -> (
    FrontCodedDictionary,
    CompletionTrie,
    I,
    ForwardIndex,
    MinimalDocsList,
) {
    let dictionary = FrontCodedDictionary::build(&parsed.tokens);
    let trie = CompletionTrie::build(&parsed.completions);
    let inverted = build_inverted(&parsed.inverted_postings, num_docs.max(1));
    let forward = ForwardIndex::build(&parsed.forward_postings, parsed.tokens.len() as u32);
    let minimal = MinimalDocsList::build(&parsed.minimal_postings, num_docs);
    (dictionary, trie, inverted, forward, minimal)
}

/// Writes `engine`'s persisted blob to `out_path`.
pub fn write_engine<I: InvertedLookup + InvertedStorage>(
    engine: &Engine<I>,
    out_path: &Path,
) -> Result<()> {
    let mut file = crate::format::create_file(out_path).map_err(IndexError::from)?;
    engine.save(&mut file)
}
