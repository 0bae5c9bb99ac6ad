//! Validation and promotion pipeline for PSC invoicing archives.
//!
//! One run per arriving archive: the zip is buffered, structurally
//! validated, its manifest headers checked and its body rewritten, and only
//! then are the entries promoted to the `valid/` area (or the original
//! archive routed to `Invalid/`). The source object is deleted as the final
//! step of every run that got past loading.

pub mod archive;
pub mod errors;
pub mod manifest;
pub mod paths;
pub mod pipeline;
pub mod rewrite;
pub mod sanitize;
pub mod store;

// Convenience re-exports
pub use archive::{load_archive, ArchiveEntry};
pub use errors::{Rejection, RunError};
pub use manifest::{validate_headers, ManifestRecord, VALID_HEADERS};
pub use paths::{ArchiveRef, DestPaths};
pub use pipeline::{
    process, validate_archive, GateConfig, PromotedEntry, RunReport, RunStatus, ValidatedArchive,
};
pub use rewrite::{encode_ascii, rewrite_body, SUBSTITUTIONS};
pub use sanitize::sanitize_name;
pub use store::{BlobStore, ObjectStoreBlobStore, StoreError, StoreSpec};

// Re-export bytes for CLI convenience
pub use bytes::Bytes;
