//! Tab-delimited manifest parsing and header validation.
//!
//! Validation stops at the first satisfied condition: a single recognized
//! field is enough to pass. No ordering or completeness checks beyond that.

use crate::errors::Rejection;

/// The canonical header vocabulary. A manifest first line must share at
/// least one field with this set. Static, never rebuilt per run.
pub const VALID_HEADERS: &[&str] = &[
    "JobNo",
    "JobDate",
    "SiteId",
    "Office",
    "FileName",
    "ServiceCode",
    "Units",
    "Description",
];

/// A manifest split into its header line and the remaining body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    /// First line, without its terminator.
    pub header: String,
    /// Everything after the first line terminator, verbatim.
    pub body: String,
}

impl ManifestRecord {
    /// Split manifest text into header line and body. Tolerates `\r\n`.
    pub fn split(text: &str) -> Self {
        match text.split_once('\n') {
            Some((line, body)) => Self {
                header: line.strip_suffix('\r').unwrap_or(line).to_string(),
                body: body.to_string(),
            },
            None => Self {
                header: text.to_string(),
                body: String::new(),
            },
        }
    }

    /// Header fields, split on tab.
    pub fn fields(&self) -> Vec<&str> {
        self.header.split('\t').collect()
    }
}

/// Decode and validate a manifest entry's content.
///
/// Rejections, checked in order:
/// - undecodable bytes -> `Encoding`
/// - no content, or empty first line -> `EmptyManifest`
/// - first line with only empty fields (e.g. `"\t\t"`) -> `NoHeaders`
/// - no intersection with [`VALID_HEADERS`] -> `InvalidHeaders`
pub fn validate_headers(entry_name: &str, content: &[u8]) -> Result<ManifestRecord, Rejection> {
    let text = std::str::from_utf8(content).map_err(|_| Rejection::Encoding {
        entry: entry_name.to_string(),
    })?;

    let record = ManifestRecord::split(text);
    if record.header.is_empty() {
        return Err(Rejection::EmptyManifest {
            entry: entry_name.to_string(),
        });
    }
    if record.fields().iter().all(|f| f.is_empty()) {
        return Err(Rejection::NoHeaders {
            entry: entry_name.to_string(),
        });
    }
    if !record
        .fields()
        .iter()
        .any(|f| VALID_HEADERS.contains(f))
    {
        return Err(Rejection::InvalidHeaders {
            entry: entry_name.to_string(),
        });
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_subset_passes() {
        let rec = validate_headers("m.txt", b"JobNo\tJobDate\tSiteId\nrow1\n").unwrap();
        assert_eq!(rec.header, "JobNo\tJobDate\tSiteId");
        assert_eq!(rec.body, "row1\n");
    }

    #[test]
    fn single_recognized_field_is_sufficient() {
        assert!(validate_headers("m.txt", b"Foo\tUnits\tBar\n").is_ok());
    }

    #[test]
    fn unknown_headers_rejected() {
        assert_eq!(
            validate_headers("m.txt", b"Foo\tBar\n"),
            Err(Rejection::InvalidHeaders {
                entry: "m.txt".into()
            })
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        // "jobno" is not in the canonical vocabulary.
        assert!(matches!(
            validate_headers("m.txt", b"jobno\tjobdate\n"),
            Err(Rejection::InvalidHeaders { .. })
        ));
    }

    #[test]
    fn empty_content_is_empty_manifest() {
        assert_eq!(
            validate_headers("m.txt", b""),
            Err(Rejection::EmptyManifest {
                entry: "m.txt".into()
            })
        );
    }

    #[test]
    fn empty_first_line_is_empty_manifest() {
        assert!(matches!(
            validate_headers("m.txt", b"\nJobNo\tJobDate\n"),
            Err(Rejection::EmptyManifest { .. })
        ));
    }

    #[test]
    fn tabs_only_first_line_has_no_headers() {
        assert!(matches!(
            validate_headers("m.txt", b"\t\t\nrest"),
            Err(Rejection::NoHeaders { .. })
        ));
    }

    #[test]
    fn non_utf8_is_encoding_rejection() {
        assert!(matches!(
            validate_headers("m.txt", &[0xff, 0xfe, 0x00]),
            Err(Rejection::Encoding { .. })
        ));
    }

    #[test]
    fn crlf_header_is_trimmed() {
        let rec = validate_headers("m.txt", b"JobNo\tUnits\r\nbody").unwrap();
        assert_eq!(rec.header, "JobNo\tUnits");
        assert_eq!(rec.body, "body");
    }
}
