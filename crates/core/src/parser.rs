//! Parser for `.env` file content.
//!
//! Responsibilities:
//! - Turn raw file text into a key/value mapping, tolerating comments,
//!   blank lines, and loose quoting.
//!
//! Does NOT handle:
//! - Writing file content back (see `merge`).
//! - Variable expansion or escape sequences; values are taken as written.
//!
//! Invariants:
//! - Parsing never fails; unrecognizable lines are silently skipped.
//! - A key repeated on a later line overwrites the earlier value.

use std::collections::BTreeMap;

/// Parses `.env` file content into a key → value mapping.
///
/// Per line: leading/trailing whitespace is trimmed; empty lines and lines
/// starting with `#` are skipped; the first `=` separates the key (trimmed)
/// from the value (taken as-is). A value wrapped in one matching pair of
/// double or single quotes has exactly that one layer stripped; embedded
/// quotes and `=` characters are not interpreted. Lines without an `=`
/// after a non-empty key are ignored.
pub fn parse(content: &str) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some(eq_index) = trimmed.find('=') else {
            continue;
        };
        if eq_index == 0 {
            continue;
        }

        let key = trimmed[..eq_index].trim().to_string();
        let value = unquote(&trimmed[eq_index + 1..]);
        vars.insert(key, value.to_string());
    }

    vars
}

/// Strips one surrounding pair of matching quotes, if present.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}
