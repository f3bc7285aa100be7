// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end: `build` runs the flat-file build pipeline,
//! `query` reads queries from stdin and writes JSON-lines results, `inspect`
//! prints a built index's section sizes without running any query.

use std::io::{self, BufRead, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use typeahead::{CompressedEngine, EngineParams, IndexError, PlainEngine};

#[derive(Parser)]
#[command(name = "typeahead", about = "Top-k query autocompletion engine", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a persisted index from `<basename>.{dict,completions,inverted,forward,mapped_minimal}`.
    Build {
        /// Basename shared by the five input files.
        basename: String,

        /// Output path for the persisted index blob.
        #[arg(short, long, default_value = "index.bin")]
        output: PathBuf,

        /// Build the block-skipping postings representation instead of plain
        /// Elias-Fano postings.
        #[arg(long)]
        compressed: bool,

        /// Override the top-k ceiling baked into the built index.
        #[arg(long, default_value_t = typeahead::MAX_K)]
        max_k: u32,
    },

    /// Read queries from stdin (one per line), write JSON-lines results to stdout.
    Query {
        /// Path to a persisted index blob.
        file: PathBuf,

        /// Number of results per query.
        #[arg(short, long, default_value_t = 10)]
        k: u32,

        /// Use conjunctive mode instead of prefix mode.
        #[arg(long)]
        conjunctive: bool,
    },

    /// Print section sizes, counts, and memory footprint of a built index.
    Inspect {
        /// Path to a persisted index blob.
        file: PathBuf,
    },
}

#[derive(Serialize)]
struct ResultLine<'a> {
    score: u32,
    text: &'a str,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run(cli: Cli) -> typeahead::Result<()> {
    match cli.command {
        Commands::Build {
            basename,
            output,
            compressed,
            max_k,
        } => run_build(&basename, &output, compressed, max_k),
        Commands::Query {
            file,
            k,
            conjunctive,
        } => run_query(&file, k, conjunctive),
        Commands::Inspect { file } => run_inspect(&file),
    }
}

fn run_build(basename: &str, output: &PathBuf, compressed: bool, max_k: u32) -> typeahead::Result<()> {
    let params = EngineParams {
        max_k,
        ..EngineParams::default()
    };
    if compressed {
        let engine = typeahead::build::build_compressed(basename, params)?;
        typeahead::build::write_engine(&engine, output)?;
    } else {
        let engine = typeahead::build::build_plain(basename, params)?;
        typeahead::build::write_engine(&engine, output)?;
    }
    eprintln!("wrote {}", output.display());
    Ok(())
}

/// Either concrete engine, loaded from the same on-disk variant tag, so
/// `query`/`inspect` don't need to guess which one a file holds up front.
enum AnyEngine {
    Plain(PlainEngine),
    Compressed(CompressedEngine),
}

fn load_any(file: &PathBuf) -> typeahead::Result<AnyEngine> {
    let bytes = typeahead::format::read_file(file)?;
    let header = typeahead::format::peek_header(&bytes)?;
    if header.variant == typeahead::format::VARIANT_BLOCKED {
        Ok(AnyEngine::Compressed(CompressedEngine::load(&bytes)?))
    } else {
        Ok(AnyEngine::Plain(PlainEngine::load(&bytes)?))
    }
}

fn run_query(file: &PathBuf, k: u32, conjunctive: bool) -> typeahead::Result<()> {
    let mut engine = load_any(file)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let query = line.map_err(IndexError::from)?;
        let results: Vec<(u32, String)> = match &mut engine {
            AnyEngine::Plain(e) => {
                let iter = if conjunctive {
                    e.conjunctive_topk(&query, k)?
                } else {
                    e.prefix_topk(&query, k)?
                };
                iter.map(|r| (r.score, r.text.to_string())).collect()
            }
            AnyEngine::Compressed(e) => {
                let iter = if conjunctive {
                    e.conjunctive_topk(&query, k)?
                } else {
                    e.prefix_topk(&query, k)?
                };
                iter.map(|r| (r.score, r.text.to_string())).collect()
            }
        };
        for (score, text) in &results {
            let line = ResultLine { score: *score, text };
            let json = serde_json::to_string(&line).map_err(|e| {
                IndexError::IoError(io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
            })?;
            writeln!(out, "{json}").map_err(IndexError::from)?;
        }
    }
    Ok(())
}

fn run_inspect(file: &PathBuf) -> typeahead::Result<()> {
    let bytes = typeahead::format::read_file(file)?;
    let engine = load_any(file)?;
    let (variant, bytes_in_memory) = match &engine {
        AnyEngine::Plain(e) => ("plain", e.bytes()),
        AnyEngine::Compressed(e) => ("compressed", e.bytes()),
    };
    println!("file size:        {} bytes", bytes.len());
    println!("variant:          {variant}");
    println!("in-memory size:   {bytes_in_memory} bytes");
    Ok(())
}
