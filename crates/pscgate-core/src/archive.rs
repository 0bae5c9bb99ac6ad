//! Archive loader: buffers an incoming zip stream into entry records.
//!
//! The whole archive is read into memory up front so both validators can run
//! to completion before a single byte is uploaded. Incoming archives are two
//! small files; streaming would buy nothing here.

use std::io::{Cursor, Read};

use bytes::Bytes;

use crate::errors::RunError;

/// Suffix that marks the manifest entry (case-insensitive).
pub const MANIFEST_SUFFIX: &str = ".txt";

/// One member of an opened archive, fully buffered.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Entry name as stored in the container.
    pub name: String,
    /// Uncompressed length in bytes.
    pub size: u64,
    /// Uncompressed content.
    pub data: Bytes,
}

impl ArchiveEntry {
    /// True when this entry is the tab-delimited manifest.
    pub fn is_manifest(&self) -> bool {
        has_manifest_suffix(&self.name)
    }
}

/// Case-insensitive manifest suffix match.
///
/// Compared as bytes so multibyte entry names cannot split a char boundary.
pub fn has_manifest_suffix(name: &str) -> bool {
    let (name, suffix) = (name.as_bytes(), MANIFEST_SUFFIX.as_bytes());
    name.len() >= suffix.len()
        && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Open a zip container from raw bytes and buffer every file entry.
///
/// Directory entries are skipped; they carry no stream. Fails with
/// [`RunError::CorruptArchive`] when the stream is not a well-formed zip.
pub fn load_archive(bytes: &[u8]) -> Result<Vec<ArchiveEntry>, RunError> {
    let cursor = Cursor::new(bytes);
    let mut zip = zip::ZipArchive::new(cursor).map_err(|e| RunError::CorruptArchive {
        reason: e.to_string(),
    })?;

    let mut entries = Vec::with_capacity(zip.len());
    for idx in 0..zip.len() {
        let mut file = zip.by_index(idx).map_err(|e| RunError::CorruptArchive {
            reason: format!("entry {idx}: {e}"),
        })?;
        if file.is_dir() {
            continue;
        }
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)
            .map_err(|e| RunError::CorruptArchive {
                reason: format!("entry '{}': {e}", file.name()),
            })?;
        entries.push(ArchiveEntry {
            name: file.name().to_string(),
            size: data.len() as u64,
            data: Bytes::from(data),
        });
    }
    Ok(entries)
}
