//! `pscgate run`: process one trigger event end to end.

use anyhow::{Context, Result};
use clap::Args;

use pscgate_core::{process, ArchiveRef, GateConfig, ObjectStoreBlobStore, RunStatus};

#[derive(Args)]
pub struct RunArgs {
    /// Trigger path relative to the source root: {yyyy}/{MM}/PSC/{name}.zip
    pub blob_path: String,

    /// Store URL (s3://bucket, az://container, file:///path, memory://)
    #[arg(long, env = "PSCGATE_STORE")]
    pub store: String,

    /// Destination root prefix for valid/Invalid areas
    #[arg(long, env = "PSCGATE_DEST_ROOT")]
    pub dest_root: String,

    /// Source root prefix the trigger path is relative to
    #[arg(long, default_value = "invoicingfiles")]
    pub source_root: String,

    /// Emit the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: RunArgs) -> Result<i32> {
    let archive = ArchiveRef::parse(&args.blob_path)
        .with_context(|| format!("bad trigger path '{}'", args.blob_path))?;
    let store = ObjectStoreBlobStore::from_url(&args.store)
        .with_context(|| format!("bad store spec '{}'", args.store))?;
    let config = GateConfig {
        source_root: args.source_root,
        dest_root: args.dest_root,
    };
    tracing::info!(
        trigger = %args.blob_path,
        source_root = %config.source_root,
        dest_root = %config.dest_root,
        "trigger accepted"
    );

    // Run boundary: process never fails; faults are in the report.
    let report = process(&store, &config, &archive).await;
    if let RunStatus::Aborted { error } = &report.status {
        tracing::error!(archive = %report.archive, %error, "run ended in abort");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match &report.status {
            RunStatus::Promoted { uploaded } => {
                println!("promoted: {} entries", uploaded.len());
                for key in uploaded {
                    println!("  {key}");
                }
            }
            RunStatus::Rejected {
                rejection,
                routed_to,
            } => {
                println!("rejected: {rejection}");
                match routed_to {
                    Some(key) => println!("  routed to {key}"),
                    None => println!("  invalid routing failed, see logs"),
                }
            }
            RunStatus::Aborted { error } => println!("aborted: {error}"),
        }
        println!(
            "source {}",
            if report.source_deleted {
                "deleted"
            } else {
                "left in place"
            }
        );
    }

    // Validation outcomes are not process failures.
    Ok(0)
}
