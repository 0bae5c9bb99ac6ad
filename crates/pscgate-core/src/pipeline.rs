//! Run orchestration: validate the whole archive, then promote or route.
//!
//! Ordering contract: every entry is buffered and every validator (structure,
//! headers, rewrite/encode) has passed before the first upload happens, so a
//! rejected archive can never be partially promoted. Uploads then run as one
//! sequential batch; the first failure aborts the rest of the batch.
//!
//! Per-run state machine:
//! `Loaded -> StructureChecked -> {Rejected | HeaderChecked} ->
//! {Rejected | Promoted} -> SourceDeleted -> Done`. No retry transitions;
//! faults are logged and folded into the report, never rethrown.

use bytes::Bytes;
use serde::Serialize;

use crate::archive::{load_archive, ArchiveEntry};
use crate::errors::{Rejection, RunError};
use crate::manifest::validate_headers;
use crate::paths::{ArchiveRef, DestPaths};
use crate::rewrite::{encode_ascii, rewrite_body};
use crate::sanitize::sanitize_name;
use crate::store::BlobStore;

/// Process-wide configuration, resolved once at startup and passed in
/// explicitly (never ambient state).
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Root prefix the trigger path is relative to.
    pub source_root: String,
    /// Root prefix promoted and routed entries land under.
    pub dest_root: String,
}

/// One entry cleared for promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotedEntry {
    /// Name inside the archive.
    pub original_name: String,
    /// Storage-safe name used as the destination key segment.
    pub sanitized_name: String,
    /// Bytes to upload: raw for data entries, the rewritten body (header
    /// line consumed by validation) for manifest entries.
    pub payload: Bytes,
    /// True when the payload went through the rewriter.
    pub rewritten: bool,
}

/// An archive that passed every validator; nothing has been uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedArchive {
    pub entries: Vec<PromotedEntry>,
}

/// Terminal status of one run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    /// All validators passed; entries uploaded to the valid area.
    Promoted { uploaded: Vec<String> },
    /// A validator rejected the archive; no valid uploads happened.
    Rejected {
        rejection: Rejection,
        /// Invalid-area key the original archive was routed to, when that
        /// upload itself succeeded.
        routed_to: Option<String>,
    },
    /// The pipeline itself faulted (corrupt container, store I/O).
    Aborted { error: String },
}

/// What one run did, for the log sink and the CLI report.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Logical archive name from the trigger path.
    pub archive: String,
    pub status: RunStatus,
    /// Whether the source object existed and was deleted at the end of the
    /// run. False when the delete failed or the object was already gone.
    pub source_deleted: bool,
}

/// Run both validators and the rewrite/encode gate over loaded entries.
///
/// Pure with respect to storage: nothing is uploaded here.
pub fn validate_archive(entries: &[ArchiveEntry]) -> Result<ValidatedArchive, Rejection> {
    if entries.len() != 2 {
        return Err(Rejection::UnexpectedEntryCount {
            count: entries.len(),
        });
    }
    if !entries.iter().any(ArchiveEntry::is_manifest) {
        return Err(Rejection::MissingManifest);
    }

    let mut promoted = Vec::with_capacity(entries.len());
    for entry in entries {
        let (payload, rewritten) = if entry.is_manifest() {
            // The header line gates validation but is not part of the
            // promoted object; downstream consumes the rewritten rows only.
            let record = validate_headers(&entry.name, &entry.data)?;
            let body = rewrite_body(&record.body);
            (Bytes::from(encode_ascii(&entry.name, &body)?), true)
        } else {
            (entry.data.clone(), false)
        };
        promoted.push(PromotedEntry {
            original_name: entry.name.clone(),
            sanitized_name: sanitize_name(&entry.name),
            payload,
            rewritten,
        });
    }
    Ok(ValidatedArchive { entries: promoted })
}

/// Process one arriving archive end to end.
///
/// This is the run boundary: every fault is logged with context and folded
/// into the returned report. The source object is deleted exactly once, as
/// the final step of any run that got past loading.
pub async fn process(store: &dyn BlobStore, config: &GateConfig, archive: &ArchiveRef) -> RunReport {
    let source_key = archive.source_key(&config.source_root);
    let dest = DestPaths::new(&config.dest_root, archive);
    tracing::info!(archive = %archive.name, key = %source_key, "processing archive");

    let raw = match store.get(&source_key).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let err = RunError::Download(e);
            tracing::error!(archive = %archive.name, error = %err, "run aborted");
            return RunReport {
                archive: archive.name.clone(),
                status: RunStatus::Aborted {
                    error: err.to_string(),
                },
                source_deleted: false,
            };
        }
    };

    let entries = match load_archive(&raw) {
        Ok(entries) => entries,
        Err(err) => {
            // Unreadable container: abort before validation, leave the
            // source in place.
            tracing::error!(archive = %archive.name, error = %err, "run aborted");
            return RunReport {
                archive: archive.name.clone(),
                status: RunStatus::Aborted {
                    error: err.to_string(),
                },
                source_deleted: false,
            };
        }
    };

    let status = match validate_archive(&entries) {
        Ok(validated) => promote(store, &dest, &archive.name, &validated).await,
        Err(rejection) => {
            route_invalid(store, &dest, archive, raw.clone(), rejection).await
        }
    };

    let source_deleted = delete_source(store, &source_key).await;
    tracing::info!(archive = %archive.name, ?status, source_deleted, "run done");

    RunReport {
        archive: archive.name.clone(),
        status,
        source_deleted,
    }
}

/// Upload every validated entry to the valid area, as one sequential batch.
async fn promote(
    store: &dyn BlobStore,
    dest: &DestPaths,
    archive_name: &str,
    validated: &ValidatedArchive,
) -> RunStatus {
    let mut uploaded = Vec::with_capacity(validated.entries.len());
    for entry in &validated.entries {
        let key = dest.valid_key(&entry.sanitized_name);
        tracing::info!(entry = %entry.original_name, key = %key, rewritten = entry.rewritten, "uploading");
        if let Err(e) = store.put(&key, entry.payload.clone()).await {
            let err = RunError::Upload {
                key: key.as_ref().to_string(),
                source: e,
            };
            tracing::error!(archive = %archive_name, error = %err, "promotion batch aborted");
            return RunStatus::Aborted {
                error: err.to_string(),
            };
        }
        uploaded.push(key.as_ref().to_string());
    }
    tracing::info!(archive = %archive_name, count = uploaded.len(), "archive promoted");
    RunStatus::Promoted { uploaded }
}

/// Route a rejected archive's original bytes to the invalid area.
async fn route_invalid(
    store: &dyn BlobStore,
    dest: &DestPaths,
    archive: &ArchiveRef,
    raw: Bytes,
    rejection: Rejection,
) -> RunStatus {
    let key = dest.invalid_key(&format!("{}.zip", sanitize_name(&archive.name)));
    tracing::warn!(archive = %archive.name, %rejection, key = %key, "validation failed, routing to invalid");

    let routed_to = match store.put(&key, raw).await {
        Ok(()) => Some(key.as_ref().to_string()),
        Err(e) => {
            let err = RunError::Upload {
                key: key.as_ref().to_string(),
                source: e,
            };
            tracing::error!(archive = %archive.name, error = %err, "invalid routing failed");
            None
        }
    };
    RunStatus::Rejected {
        rejection,
        routed_to,
    }
}

/// Delete the source object; failure is logged, never escalated.
///
/// Returns whether the object existed and was actually removed.
async fn delete_source(store: &dyn BlobStore, key: &object_store::path::Path) -> bool {
    match store.delete(key).await {
        Ok(true) => {
            tracing::info!(key = %key, "source archive deleted");
            true
        }
        Ok(false) => {
            tracing::warn!(key = %key, "source archive already absent, nothing deleted");
            false
        }
        Err(e) => {
            let err = RunError::Delete {
                key: key.as_ref().to_string(),
                source: e,
            };
            tracing::error!(error = %err, "source delete failed");
            false
        }
    }
}
