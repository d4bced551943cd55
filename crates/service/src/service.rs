//! Read/write orchestration over the store and the env file.
//!
//! Responsibilities:
//! - Serve the reconciled variable view (store + env file).
//! - Apply full-set writes: validate, resolve masked secrets, persist to
//!   the store, then mirror to the stack's env file.
//!
//! Does NOT handle:
//! - Reconciliation policy itself (see `stackenv-core`).
//! - Store persistence mechanics (see `store`).
//!
//! Invariants:
//! - The store write completes before the env file is read back and
//!   merged; a store failure never produces a file reflecting unsaved
//!   values.
//! - Env file trouble is never fatal: reads degrade to store-only data,
//!   writes degrade to the `FileSync` outcomes.

use std::collections::BTreeMap;
use std::path::PathBuf;

use stackenv_core::{
    MASK_PLACEHOLDER, Variable, build_view, is_valid_key, merge, parse, resolve_masked_secrets,
};

use crate::access::{AccessPolicy, Action, AllowAll, Resource};
use crate::error::ServiceError;
use crate::paths::{env_file_path, stack_dir};
use crate::scope::StackScope;
use crate::store::VariableStore;

/// Outcome of the env-file mirror step of a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSync {
    /// The env file was written.
    Written,
    /// The stack has no working directory, so no file mirror exists. The
    /// variables still live in the store; this is a partial-success mode,
    /// not an error.
    SkippedNoStackDir,
    /// Writing the file failed; the store remains authoritative.
    Failed,
}

/// Result of a successful write: how many variables were persisted and
/// what happened to the file mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub count: usize,
    pub file_sync: FileSync,
}

/// Environment-variable service for stacks.
///
/// Stateless apart from its collaborators; concurrent use across scopes
/// is safe, and two writers on the same scope race with last-write-wins
/// on the file, as documented.
pub struct EnvVarService<S, P = AllowAll> {
    store: S,
    policy: P,
    stacks_dir: PathBuf,
}

impl<S: VariableStore> EnvVarService<S, AllowAll> {
    /// Creates a service with the allow-everything policy.
    pub fn new(store: S, stacks_dir: PathBuf) -> Self {
        Self::with_policy(store, AllowAll, stacks_dir)
    }
}

impl<S: VariableStore, P: AccessPolicy> EnvVarService<S, P> {
    /// Creates a service with an explicit access policy.
    pub fn with_policy(store: S, policy: P, stacks_dir: PathBuf) -> Self {
        Self {
            store,
            policy,
            stacks_dir,
        }
    }

    /// Returns the underlying variable store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the reconciled variable view for a scope, secrets masked.
    ///
    /// File data is best-effort: a missing or unreadable env file falls
    /// back to store data alone.
    pub fn variables(&self, scope: &StackScope) -> Result<Vec<Variable>, ServiceError> {
        self.authorize(Action::View, scope)?;

        let stored = self.store.read_variables(scope, false)?;
        let file_vars = self.read_env_file(scope);

        Ok(build_view(&stored, &file_vars))
    }

    /// Replaces the scope's variable set.
    ///
    /// `incoming` must be the **complete** desired set: keys absent from
    /// it are deleted from the store and from the env file. Masked secret
    /// placeholders are resolved against stored values before anything is
    /// persisted. The store write is the operation's success criterion;
    /// the env-file mirror is best-effort and reported via `FileSync`.
    pub fn set_variables(
        &self,
        scope: &StackScope,
        incoming: Vec<Variable>,
    ) -> Result<WriteOutcome, ServiceError> {
        self.authorize(Action::Edit, scope)?;

        for var in &incoming {
            if !is_valid_key(&var.key) {
                return Err(ServiceError::InvalidKey {
                    key: var.key.clone(),
                });
            }
        }

        let needs_resolution = incoming
            .iter()
            .any(|v| v.is_secret && v.value == MASK_PLACEHOLDER);
        let resolved = if needs_resolution {
            let existing = self.store.read_variables(scope, true)?;
            let existing_by_key: BTreeMap<String, Variable> = existing
                .into_iter()
                .map(|v| (v.key.clone(), v))
                .collect();
            resolve_masked_secrets(incoming, &existing_by_key)
        } else {
            incoming
        };

        self.store.write_variables(scope, &resolved)?;
        tracing::debug!(scope = %scope, count = resolved.len(), "Variables persisted to store");

        let file_sync = self.sync_env_file(scope, &resolved);

        Ok(WriteOutcome {
            count: resolved.len(),
            file_sync,
        })
    }

    fn authorize(&self, action: Action, scope: &StackScope) -> Result<(), ServiceError> {
        if self.policy.can(Resource::Stacks, action, scope.environment) {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied {
                resource: Resource::Stacks.to_string(),
                action: action.to_string(),
            })
        }
    }

    /// Reads and parses the scope's env file, degrading to an empty
    /// mapping when the file is missing or unreadable.
    fn read_env_file(&self, scope: &StackScope) -> BTreeMap<String, String> {
        let path = env_file_path(&stack_dir(&self.stacks_dir, &scope.stack));
        match std::fs::read_to_string(&path) {
            Ok(content) => parse(&content),
            Err(e) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %e,
                    "Env file unavailable, using store data only"
                );
                BTreeMap::new()
            }
        }
    }

    /// Mirrors the resolved variable set into the stack's env file,
    /// preserving the file's comments and formatting.
    fn sync_env_file(&self, scope: &StackScope, variables: &[Variable]) -> FileSync {
        let dir = stack_dir(&self.stacks_dir, &scope.stack);
        if !dir.is_dir() {
            tracing::debug!(
                stack = %scope.stack,
                dir = %dir.display(),
                "Stack directory does not exist, skipping env file write"
            );
            return FileSync::SkippedNoStackDir;
        }

        let path = env_file_path(&dir);
        let existing = std::fs::read_to_string(&path).unwrap_or_default();
        let content = merge(&existing, variables);

        match std::fs::write(&path, content) {
            Ok(()) => FileSync::Written,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to write env file, store remains authoritative"
                );
                FileSync::Failed
            }
        }
    }
}
