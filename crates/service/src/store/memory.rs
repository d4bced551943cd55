//! In-memory variable store for tests and ephemeral use.

use std::collections::BTreeMap;
use std::sync::Mutex;

use stackenv_core::Variable;

use crate::error::StoreError;
use crate::scope::StackScope;

use super::{StoredVariable, VariableStore};

/// `Mutex`-guarded in-memory store keyed by scope. Mirrors the masking
/// behavior of the persistent store so service tests exercise the same
/// read semantics.
#[derive(Default)]
pub struct MemoryStore {
    sets: Mutex<BTreeMap<(String, Option<i64>), Vec<StoredVariable>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VariableStore for MemoryStore {
    fn read_variables(
        &self,
        scope: &StackScope,
        unmask_secrets: bool,
    ) -> Result<Vec<Variable>, StoreError> {
        let sets = self.sets.lock().expect("memory store lock poisoned");
        Ok(sets
            .get(&(scope.stack.clone(), scope.environment))
            .map(|vars| vars.iter().map(|v| v.to_variable(unmask_secrets)).collect())
            .unwrap_or_default())
    }

    fn write_variables(
        &self,
        scope: &StackScope,
        variables: &[Variable],
    ) -> Result<(), StoreError> {
        let mut sets = self.sets.lock().expect("memory store lock poisoned");
        sets.insert(
            (scope.stack.clone(), scope.environment),
            variables.iter().map(StoredVariable::from_variable).collect(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackenv_core::MASK_PLACEHOLDER;

    #[test]
    fn test_memory_store_masks_like_the_persistent_store() {
        let store = MemoryStore::new();
        let scope = StackScope::new("web");

        store
            .write_variables(&scope, &[Variable::secret("TOKEN", "raw")])
            .unwrap();

        let masked = store.read_variables(&scope, false).unwrap();
        assert_eq!(masked[0].value, MASK_PLACEHOLDER);

        let raw = store.read_variables(&scope, true).unwrap();
        assert_eq!(raw[0].value, "raw");
    }

    #[test]
    fn test_unknown_scope_reads_empty() {
        let store = MemoryStore::new();
        let vars = store
            .read_variables(&StackScope::new("missing"), false)
            .unwrap();
        assert!(vars.is_empty());
    }
}
