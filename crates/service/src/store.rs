//! Variable store trait and stored record types.
//!
//! Responsibilities:
//! - Define the narrow interface the service uses to read and write a
//!   scope's variable set.
//! - Hold stored secret values behind `secrecy::SecretString` and decide
//!   between masked and raw reads.
//!
//! Does NOT handle:
//! - Reconciliation policy (see `stackenv-core`).
//! - Env file mirroring (see `service`).
//!
//! Invariants:
//! - A masked read never exposes a secret's value, only the placeholder.
//! - `write_variables` replaces the full set for the scope.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use stackenv_core::{MASK_PLACEHOLDER, Variable};

use crate::error::StoreError;
use crate::scope::StackScope;

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

/// Module for serializing SecretString as strings.
mod secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize as DeserializeTrait, Serialize as SerializeTrait};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        secret.expose_secret().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SecretString::new(s.into()))
    }
}

/// Structured-store access for one (stack, environment) scope at a time.
///
/// `unmask_secrets` selects between display-masked secret values (read
/// views) and raw values (secret resolution before a write).
pub trait VariableStore {
    /// Returns the stored variable set for the scope; an unknown scope
    /// yields an empty set.
    fn read_variables(
        &self,
        scope: &StackScope,
        unmask_secrets: bool,
    ) -> Result<Vec<Variable>, StoreError>;

    /// Replaces the full variable set for the scope.
    fn write_variables(
        &self,
        scope: &StackScope,
        variables: &[Variable],
    ) -> Result<(), StoreError>;
}

/// One variable as held at rest. The value always lives behind
/// `SecretString` so neither plain nor secret values leak through `Debug`;
/// serialization goes through the `secret_string` adapter for persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredVariable {
    pub key: String,
    #[serde(with = "secret_string")]
    pub value: SecretString,
    #[serde(default)]
    pub is_secret: bool,
}

impl StoredVariable {
    pub(crate) fn from_variable(var: &Variable) -> Self {
        Self {
            key: var.key.clone(),
            value: SecretString::new(var.value.clone().into()),
            is_secret: var.is_secret,
        }
    }

    /// Converts to the caller-facing record, masking the value unless the
    /// caller asked for raw secrets.
    pub(crate) fn to_variable(&self, unmask_secrets: bool) -> Variable {
        let value = if self.is_secret && !unmask_secrets {
            MASK_PLACEHOLDER.to_string()
        } else {
            self.value.expose_secret().to_string()
        };
        Variable {
            key: self.key.clone(),
            value,
            is_secret: self.is_secret,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_read_substitutes_placeholder() {
        let stored = StoredVariable::from_variable(&Variable::secret("TOKEN", "raw"));
        assert_eq!(stored.to_variable(false).value, MASK_PLACEHOLDER);
        assert_eq!(stored.to_variable(true).value, "raw");
    }

    #[test]
    fn test_plain_value_is_never_masked() {
        let stored = StoredVariable::from_variable(&Variable::plain("PORT", "8080"));
        assert_eq!(stored.to_variable(false).value, "8080");
        assert_eq!(stored.to_variable(true).value, "8080");
    }

    /// Stored values must not leak through Debug, secret or not.
    #[test]
    fn test_debug_output_redacts_stored_values() {
        let stored = StoredVariable::from_variable(&Variable::secret("TOKEN", "raw-secret"));
        let debug_output = format!("{:?}", stored);
        assert!(!debug_output.contains("raw-secret"));
    }

    #[test]
    fn test_stored_variable_serde_round_trip() {
        let stored = StoredVariable::from_variable(&Variable::secret("TOKEN", "raw"));
        let json = serde_json::to_string(&stored).unwrap();
        let back: StoredVariable = serde_json::from_str(&json).unwrap();
        assert_eq!(back.key, "TOKEN");
        assert!(back.is_secret);
        assert_eq!(back.value.expose_secret(), "raw");
    }
}
