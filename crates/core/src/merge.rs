//! Merger for `.env` file content.
//!
//! Responsibilities:
//! - Produce new file content from prior content plus a desired variable
//!   set, preserving the user's comments and formatting.
//!
//! Does NOT handle:
//! - Reading or writing files (see `stackenv-service`).
//! - Secret resolution; callers pass values that are ready to be written.
//!
//! Invariants:
//! - Blank, comment, and malformed lines are copied verbatim, in position.
//! - The result always ends with a trailing newline.
//! - Absence from `desired` deletes the corresponding file line.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::Variable;

/// Merges a desired variable set into existing `.env` file content.
///
/// Walks the existing content line by line: blank and comment lines are
/// kept verbatim; a variable line whose key appears in `desired` is
/// rewritten as bare `key=value` (original quoting is not preserved); a
/// variable line whose key is absent from `desired` is dropped; lines that
/// are neither comments nor assignments are kept verbatim. Desired keys
/// not found in the existing content are appended, in `desired` order,
/// with the last value winning for a key repeated in `desired`.
///
/// Callers must pass the **complete** variable set for the file: this
/// function treats a missing key as an intentional deletion, so submitting
/// a partial set silently removes every key it omits.
pub fn merge(existing: &str, desired: &[Variable]) -> String {
    let mut desired_map: BTreeMap<&str, &str> = BTreeMap::new();
    for var in desired {
        desired_map.insert(var.key.as_str(), var.value.as_str());
    }

    let mut handled: BTreeSet<&str> = BTreeSet::new();
    let mut lines: Vec<String> = Vec::new();

    // An absent or empty file has no lines to walk; splitting "" would put
    // a phantom blank line ahead of the appended variables.
    if !existing.is_empty() {
        for line in existing.split('\n') {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                lines.push(line.to_string());
                continue;
            }

            match trimmed.find('=') {
                Some(eq_index) if eq_index > 0 => {
                    let key = trimmed[..eq_index].trim();
                    if let Some(value) = desired_map.get(key) {
                        lines.push(format!("{key}={value}"));
                        handled.insert(key);
                    }
                    // Key absent from the desired set: the line is deleted.
                }
                _ => lines.push(line.to_string()),
            }
        }
    }

    for var in desired {
        let key = var.key.as_str();
        if handled.insert(key) {
            lines.push(format!("{}={}", key, desired_map[key]));
        }
    }

    let mut result = lines.join("\n");
    if !result.ends_with('\n') {
        result.push('\n');
    }
    result
}
