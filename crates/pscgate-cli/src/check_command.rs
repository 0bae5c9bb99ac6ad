//! `pscgate check`: offline validation of a local archive.
//!
//! Runs the same validators the gate runs, against a file on disk, so an
//! operator can reproduce a rejection without store credentials.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use pscgate_core::{load_archive, validate_archive, RunError};

#[derive(Args)]
pub struct CheckArgs {
    /// Path to a local .zip archive
    pub archive: PathBuf,
}

pub fn run(args: CheckArgs) -> Result<i32> {
    let bytes = std::fs::read(&args.archive)
        .with_context(|| format!("failed to read {}", args.archive.display()))?;

    let entries = match load_archive(&bytes) {
        Ok(entries) => entries,
        Err(RunError::CorruptArchive { reason }) => {
            println!("corrupt archive: {reason}");
            return Ok(2);
        }
        Err(e) => return Err(e.into()),
    };

    match validate_archive(&entries) {
        Ok(validated) => {
            println!("valid: would promote {} entries", validated.entries.len());
            for entry in &validated.entries {
                println!(
                    "  {} -> {}{}",
                    entry.original_name,
                    entry.sanitized_name,
                    if entry.rewritten { " (rewritten)" } else { "" }
                );
            }
            Ok(0)
        }
        Err(rejection) => {
            println!("rejected: {rejection}");
            Ok(1)
        }
    }
}
