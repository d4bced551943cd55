//! Reconciled view of store and file variables.
//!
//! Responsibilities:
//! - Combine the structured store's variable set with the parsed file
//!   mapping into the single externally visible list.
//!
//! Does NOT handle:
//! - Masking (the store supplies display-masked secret values).
//! - Persistence of the view; it is built transiently per request.
//!
//! Invariants:
//! - A secret's displayed value always comes from the store; the file's
//!   value for a secret key is ignored entirely.
//! - Emission order is deterministic per call, but not contractual.

use std::collections::BTreeMap;

use crate::types::Variable;

/// Builds the externally visible variable list from the store's variables
/// (secrets already display-masked) and the parsed file mapping.
///
/// Per-key precedence:
///
/// | secret? | in store? | in file?       | emitted                         |
/// |---------|-----------|----------------|---------------------------------|
/// | yes     | yes       | any            | stored (masked) value, secret   |
/// | no      | yes       | yes, different | file value (user-edited source) |
/// | no      | yes       | no / equal     | stored value                    |
/// | any     | no        | yes            | file value, non-secret          |
///
/// Stored variables are emitted in their given order, followed by file-only
/// keys in sorted order.
pub fn build_view(stored: &[Variable], file_vars: &BTreeMap<String, String>) -> Vec<Variable> {
    let mut view: Vec<Variable> = stored
        .iter()
        .map(|var| reconcile(var, file_vars.get(&var.key).map(String::as_str)))
        .collect();

    for (key, value) in file_vars {
        if !stored.iter().any(|var| var.key == *key) {
            view.push(Variable::plain(key.clone(), value.clone()));
        }
    }

    view
}

/// Decides the emitted entry for a key that exists in the store.
fn reconcile(stored: &Variable, file_value: Option<&str>) -> Variable {
    match (stored.is_secret, file_value) {
        // File content never overrides a secret's displayed value.
        (true, _) => stored.clone(),
        // A diverging file value is the most recently user-edited source.
        (false, Some(file)) if file != stored.value => {
            Variable::plain(stored.key.clone(), file)
        }
        (false, _) => stored.clone(),
    }
}
