//! Error and rejection taxonomy for a validation run.
//!
//! `Rejection` is an outcome, not a fault: a well-formed archive that fails
//! validation is routed to the `Invalid/` area and the run still completes.
//! `RunError` covers faults that stop the pipeline itself.

use thiserror::Error;

use crate::store::StoreError;

/// Faults that abort pipeline stages.
#[derive(Debug, Error)]
pub enum RunError {
    /// The downloaded stream is not a well-formed zip container.
    /// Aborts the run before any validation; the source is left in place.
    #[error("corrupt archive: {reason}")]
    CorruptArchive { reason: String },

    /// Downloading the source archive failed.
    #[error("download failed: {0}")]
    Download(#[source] StoreError),

    /// Uploading a promoted or routed entry failed.
    #[error("upload of '{key}' failed: {source}")]
    Upload {
        key: String,
        #[source]
        source: StoreError,
    },

    /// Deleting the source archive failed. Logged, never escalated.
    #[error("delete of source '{key}' failed: {source}")]
    Delete {
        key: String,
        #[source]
        source: StoreError,
    },
}

/// Why an archive was rejected. Carried through the run as a value so the
/// writer can route the archive and the report can name the reason.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// The archive does not contain exactly two entries.
    UnexpectedEntryCount { count: usize },
    /// No entry name carries the manifest suffix.
    MissingManifest,
    /// The manifest entry has no content, or an empty first line.
    EmptyManifest { entry: String },
    /// The first line splits into no usable fields.
    NoHeaders { entry: String },
    /// The first line shares no field with the canonical header set.
    InvalidHeaders { entry: String },
    /// The manifest is not decodable, or rewriting produced non-ASCII text.
    Encoding { entry: String },
}

impl Rejection {
    /// True for the structural reasons (no entry was ever opened).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedEntryCount { .. } | Self::MissingManifest
        )
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedEntryCount { count } => {
                write!(f, "expected 2 entries, found {count}")
            }
            Self::MissingManifest => write!(f, "no manifest (.txt) entry"),
            Self::EmptyManifest { entry } => write!(f, "empty manifest '{entry}'"),
            Self::NoHeaders { entry } => write!(f, "no header fields in '{entry}'"),
            Self::InvalidHeaders { entry } => {
                write!(f, "no recognized header fields in '{entry}'")
            }
            Self::Encoding { entry } => write!(f, "non-ASCII content in '{entry}'"),
        }
    }
}
