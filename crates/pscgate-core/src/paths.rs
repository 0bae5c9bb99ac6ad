//! Key construction for source and destination objects.
//!
//! Source layout:      `{source_root}/{yyyy}/{MM}/PSC/{name}.zip`
//! Destination layout: `{dest_root}/{yyyy}/{MM}/PSC/{valid|Invalid}/{entry}`
//!
//! The year/month partition comes from the trigger path, so a run promotes
//! into the same partition the archive arrived under.

use object_store::path::Path;
use thiserror::Error;

/// Category segment shared by source and destination layouts.
pub const CATEGORY: &str = "PSC";

/// A trigger path that does not match the expected layout.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid trigger path '{path}': {reason}")]
pub struct InvalidTriggerPath {
    pub path: String,
    pub reason: String,
}

/// Parsed identity of an incoming archive: partition + logical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRef {
    /// Four-digit year segment.
    pub year: String,
    /// Two-digit month segment.
    pub month: String,
    /// Logical name, without the `.zip` suffix.
    pub name: String,
}

impl ArchiveRef {
    /// Parse a source-root-relative trigger path: `{yyyy}/{MM}/PSC/{name}.zip`.
    pub fn parse(path: &str) -> Result<Self, InvalidTriggerPath> {
        let err = |reason: &str| InvalidTriggerPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = path.trim_matches('/');
        let segments: Vec<&str> = trimmed.split('/').collect();
        let &[year, month, category, file] = segments.as_slice() else {
            return Err(err("expected {yyyy}/{MM}/PSC/{name}.zip"));
        };
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err("year must be four digits"));
        }
        if month.len() != 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err("month must be two digits"));
        }
        if category != CATEGORY {
            return Err(err("category segment must be PSC"));
        }
        let Some(name) = file.strip_suffix(".zip") else {
            return Err(err("archive name must end in .zip"));
        };
        if name.is_empty() {
            return Err(err("archive name is empty"));
        }
        Ok(Self {
            year: year.to_string(),
            month: month.to_string(),
            name: name.to_string(),
        })
    }

    /// Full key of the source object under its root.
    pub fn source_key(&self, source_root: &str) -> Path {
        Path::from(format!(
            "{}/{}/{}/{}/{}.zip",
            source_root.trim_matches('/'),
            self.year,
            self.month,
            CATEGORY,
            self.name
        ))
    }
}

/// Destination key builder for one run's partition.
#[derive(Debug, Clone)]
pub struct DestPaths {
    base: String,
}

impl DestPaths {
    /// Build the `{root}/{yyyy}/{MM}/PSC` base for a run.
    pub fn new(dest_root: &str, archive: &ArchiveRef) -> Self {
        Self {
            base: format!(
                "{}/{}/{}/{}",
                dest_root.trim_matches('/'),
                archive.year,
                archive.month,
                CATEGORY
            ),
        }
    }

    /// Key for a promoted entry.
    pub fn valid_key(&self, sanitized_name: &str) -> Path {
        Path::from(format!("{}/valid/{}", self.base, sanitized_name))
    }

    /// Key for a rejected archive routed to the invalid area.
    pub fn invalid_key(&self, sanitized_name: &str) -> Path {
        Path::from(format!("{}/Invalid/{}", self.base, sanitized_name))
    }
}
