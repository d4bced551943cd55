//! JSON-file-backed variable store.
//!
//! Responsibilities:
//! - Persist every stack's variable sets in one JSON document.
//! - Atomic save operations (temp file + rename).
//! - Backup corrupt store files before falling back to defaults.
//!
//! Does NOT handle:
//! - Path defaults (see `paths` module).
//! - Masking policy beyond the `unmask_secrets` flag (see `StoredVariable`).
//!
//! Invariants:
//! - Writes are atomic; the store file is never left half-written.
//! - A corrupt file is renamed to `.corrupt.{timestamp}` rather than
//!   silently overwritten.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use stackenv_core::Variable;

use crate::error::StoreError;
use crate::scope::StackScope;

use super::{StoredVariable, VariableStore};

/// On-disk document: variable sets for all stacks, keyed by stack name.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    stacks: BTreeMap<String, StackRecord>,
}

/// A stack's variable sets: the default scope plus per-environment sets
/// keyed by the environment id (JSON object keys are strings).
#[derive(Debug, Default, Serialize, Deserialize)]
struct StackRecord {
    #[serde(default)]
    default: Vec<StoredVariable>,
    #[serde(default)]
    environments: BTreeMap<String, Vec<StoredVariable>>,
}

/// Variable store persisted as a single JSON file.
///
/// Every operation re-reads the file, so concurrent processes observe each
/// other's committed writes; two concurrent writers race with last-write-
/// wins semantics, the same contract the env file itself has.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the given file path. The file is created
    /// on first write.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the store document, falling back to defaults when the file
    /// does not exist or is corrupt. A corrupt file is backed up first so
    /// its contents stay recoverable; an unreadable file (other than
    /// not-found) is a hard error because proceeding would drop data on
    /// the next save.
    fn load(&self) -> Result<StoreFile, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoreFile::default());
            }
            Err(e) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        match serde_json::from_str(&content) {
            Ok(file) => Ok(file),
            Err(e) => {
                match create_corrupt_backup(&self.path) {
                    Ok(backup_path) => tracing::warn!(
                        path = %self.path.display(),
                        backup_path = %backup_path.display(),
                        error = %e,
                        "Store file is corrupt, backed up and using defaults"
                    ),
                    Err(backup_err) => tracing::error!(
                        path = %self.path.display(),
                        error = %e,
                        backup_error = %backup_err,
                        "Store file is corrupt and backup failed, using defaults"
                    ),
                }
                Ok(StoreFile::default())
            }
        }
    }

    /// Atomically saves the store document to disk.
    fn atomic_save(&self, file: &StoreFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                path: self.path.clone(),
                source: e,
            })?;
        }

        let content = serde_json::to_string_pretty(file).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            source: e,
        })?;

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, content).map_err(|e| StoreError::Write {
            path: temp_path.clone(),
            source: e,
        })?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %self.path.display(), "Store saved atomically");
        Ok(())
    }
}

impl VariableStore for JsonFileStore {
    fn read_variables(
        &self,
        scope: &StackScope,
        unmask_secrets: bool,
    ) -> Result<Vec<Variable>, StoreError> {
        let file = self.load()?;
        let Some(record) = file.stacks.get(&scope.stack) else {
            return Ok(Vec::new());
        };
        let stored = match scope.environment {
            None => Some(&record.default),
            Some(env) => record.environments.get(&env.to_string()),
        };
        Ok(stored
            .map(|vars| vars.iter().map(|v| v.to_variable(unmask_secrets)).collect())
            .unwrap_or_default())
    }

    fn write_variables(
        &self,
        scope: &StackScope,
        variables: &[Variable],
    ) -> Result<(), StoreError> {
        let mut file = self.load()?;
        let record = file.stacks.entry(scope.stack.clone()).or_default();
        let stored: Vec<StoredVariable> =
            variables.iter().map(StoredVariable::from_variable).collect();
        match scope.environment {
            None => record.default = stored,
            Some(env) => {
                record.environments.insert(env.to_string(), stored);
            }
        }
        self.atomic_save(&file)
    }
}

/// Creates a backup of a corrupt store file before it is replaced.
///
/// The file is renamed to `<name>.corrupt.{timestamp}` so startup can
/// continue with defaults while the original contents stay on disk.
fn create_corrupt_backup(path: &Path) -> Result<PathBuf, std::io::Error> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let backup_path = path.with_extension(format!("corrupt.{}", timestamp));
    std::fs::rename(path, &backup_path)?;

    Ok(backup_path)
}
