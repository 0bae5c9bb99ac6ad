//! Entry-name sanitization for the storage addressing scheme.

/// Map an archive entry name to a storage-safe name.
///
/// Every character outside `[A-Za-z0-9-]` becomes `-`, then the result is
/// lowercased. Deterministic and idempotent; no length cap (object-store
/// key limits are the backend's concern).
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}
