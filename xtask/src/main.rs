//! Custom cargo commands for the typeahead crate.
//!
//! Usage:
//!   cargo xtask verify    - Run the full verification suite
//!   cargo xtask test      - Run all tests
//!   cargo xtask check     - Quick check (cargo check + test)
//!   cargo xtask bench     - Run benchmarks

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::Command;

fn main() -> Result<()> {
    let task = env::args().nth(1);
    match task.as_deref() {
        Some("verify") => verify()?,
        Some("test") => test()?,
        Some("check") => check()?,
        Some("bench") => bench()?,
        Some("fuzz") => fuzz()?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"
cargo xtask <COMMAND>

Commands:
  verify    Run the full verification suite (test + clippy)
  test      Run all Rust tests
  check     Quick check (cargo check + test)
  bench     Run benchmarks
  fuzz      List available fuzz targets (cargo-fuzz run <target> to execute one)
"#
    );
}

/// Full verification suite.
fn verify() -> Result<()> {
    println!("==========================================");
    println!("typeahead verification suite");
    println!("==========================================\n");

    println!("[1/2] Running Rust tests...");
    run_cargo(&["test", "--quiet"])?;
    println!("✓ All Rust tests passed\n");

    println!("[2/2] Running clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;
    println!("✓ Clippy passed\n");

    println!("==========================================");
    println!("✓ ALL VERIFICATION CHECKS PASSED");
    println!("==========================================");

    Ok(())
}

/// Run all tests.
fn test() -> Result<()> {
    run_cargo(&["test"])
}

/// Quick check.
fn check() -> Result<()> {
    println!("Running quick checks...\n");

    println!("[1/2] cargo check...");
    run_cargo(&["check"])?;

    println!("[2/2] cargo test...");
    run_cargo(&["test", "--quiet"])?;

    println!("\n✓ Quick checks passed");
    Ok(())
}

/// Run benchmarks.
fn bench() -> Result<()> {
    run_cargo(&["bench"])
}

/// List fuzz targets available under `fuzz/fuzz_targets/`.
fn fuzz() -> Result<()> {
    let root = project_root()?;
    let targets_dir = root.join("fuzz").join("fuzz_targets");
    if !targets_dir.exists() {
        println!("(no fuzz/fuzz_targets directory)");
        return Ok(());
    }
    for entry in std::fs::read_dir(&targets_dir).context("Failed to read fuzz_targets")? {
        let entry = entry?;
        if let Some(name) = entry.path().file_stem().and_then(|s| s.to_str()) {
            println!("{name}");
        }
    }
    println!("\nRun one with: cargo fuzz run <target>");
    Ok(())
}

// ============================================================================
// Helper functions
// ============================================================================

fn project_root() -> Result<PathBuf> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::current_dir().unwrap());

    // xtask is in project_root/xtask, so go up one level
    let root = manifest_dir.parent().unwrap_or(&manifest_dir);
    Ok(root.to_path_buf())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    let root = project_root()?;

    let status = Command::new("cargo")
        .args(args)
        .current_dir(&root)
        .status()
        .with_context(|| format!("Failed to run cargo {:?}", args))?;

    if !status.success() {
        bail!("cargo {:?} failed", args);
    }

    Ok(())
}
