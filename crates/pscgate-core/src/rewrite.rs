//! Literal token substitution over the manifest body.
//!
//! Legacy cost-center tags are collapsed to the canonical `PESTMTS` tag.
//! Patterns are literals; replacement is case-sensitive and applies to every
//! occurrence, in table order.

use crate::errors::Rejection;

/// Fixed substitution table, applied in order. Process-wide, never mutated.
pub const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("REVPAY-RECS-OH", "PESTMTS"),
    ("REVPAY-RECS-AZ", "PESTMTS"),
    ("REVPAY-EDEL-OH", "PESTMTS"),
    ("REVPAY-EDEL-AZ", "PESTMTS"),
];

/// Apply the substitution table to the manifest body. Pure.
pub fn rewrite_body(body: &str) -> String {
    let mut out = body.to_string();
    for (from, to) in SUBSTITUTIONS {
        out = out.replace(from, to);
    }
    out
}

/// Encode rewritten manifest text as ASCII bytes.
///
/// The promoted manifest is restricted to the ASCII subset; any character
/// outside it is a hard [`Rejection::Encoding`], never a silent substitution.
pub fn encode_ascii(entry_name: &str, text: &str) -> Result<Vec<u8>, Rejection> {
    if !text.is_ascii() {
        return Err(Rejection::Encoding {
            entry: entry_name.to_string(),
        });
    }
    Ok(text.as_bytes().to_vec())
}
