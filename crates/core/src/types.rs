//! Shared variable types for the reconciliation engine.
//!
//! Responsibilities:
//! - Define the `Variable` record exchanged between the store, the file
//!   layer, and callers.
//! - Validate variable key syntax.
//!
//! Does NOT handle:
//! - Secret storage or masking policy (see `stackenv-service` for storage,
//!   `view` for display policy).
//!
//! Invariants:
//! - A secret's value never appears in `Debug` output.
//! - Keys are unique within one (stack, environment) scope; uniqueness is
//!   enforced by the store, not by this type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::MASK_PLACEHOLDER;

/// One environment variable as seen by callers: a key, a value, and a
/// secret flag.
///
/// Serialization uses the `isSecret` wire name; the flag defaults to
/// `false` when absent on input.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    pub value: String,
    #[serde(rename = "isSecret", default)]
    pub is_secret: bool,
}

impl Variable {
    /// Creates a non-secret variable.
    pub fn plain(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            is_secret: false,
        }
    }

    /// Creates a secret variable.
    pub fn secret(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            is_secret: true,
        }
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.is_secret {
            MASK_PLACEHOLDER
        } else {
            self.value.as_str()
        };
        f.debug_struct("Variable")
            .field("key", &self.key)
            .field("value", &value)
            .field("is_secret", &self.is_secret)
            .finish()
    }
}

/// Returns true when `key` is a valid environment variable name:
/// a letter or underscore followed by letters, digits, or underscores
/// (the pattern `^[A-Za-z_][A-Za-z0-9_]*$`).
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
