//! Resolution of masked secret placeholders in incoming writes.
//!
//! Responsibilities:
//! - Replace `***` placeholder values on incoming secret entries with the
//!   stored raw values before anything is persisted.
//!
//! Does NOT handle:
//! - Reading the store; the caller supplies an unmasked lookup of the
//!   existing variables.
//!
//! Invariants:
//! - Runs before persistence and before the file merge.
//! - Entries that are not masked secrets pass through unchanged.

use std::collections::BTreeMap;

use crate::constants::MASK_PLACEHOLDER;
use crate::types::Variable;

/// Replaces masked secret placeholders with the stored raw values.
///
/// An incoming entry is resolved when it is flagged secret, its value is
/// the `***` placeholder, and the scope already holds a secret under the
/// same key. `existing` must come from an **unmasked** store read. When no
/// stored secret exists for the key, the placeholder is kept verbatim and
/// will be persisted literally: a caller error this function logs but
/// does not correct.
pub fn resolve_masked_secrets(
    incoming: Vec<Variable>,
    existing: &BTreeMap<String, Variable>,
) -> Vec<Variable> {
    incoming
        .into_iter()
        .map(|var| {
            if !(var.is_secret && var.value == MASK_PLACEHOLDER) {
                return var;
            }
            match existing.get(&var.key) {
                Some(prev) if prev.is_secret => Variable {
                    value: prev.value.clone(),
                    ..var
                },
                _ => {
                    tracing::warn!(
                        key = %var.key,
                        "masked placeholder received for a key with no stored secret; \
                         the literal placeholder will be persisted"
                    );
                    var
                }
            }
        })
        .collect()
}
