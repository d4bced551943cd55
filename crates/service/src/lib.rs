//! Collaborator layer for the stackenv reconciliation engine.
//!
//! This crate hosts everything around the pure core: the variable store
//! trait with its JSON-file-backed and in-memory implementations, stack
//! directory and env-file path resolution, the access-policy seam, and
//! `EnvVarService`, which wires the read and write paths together.

pub mod access;
mod error;
pub mod paths;
pub mod service;
pub mod store;

mod scope;

pub use access::{AccessPolicy, Action, AllowAll, Resource};
pub use error::{ServiceError, StoreError};
pub use paths::env_var_or_none;
pub use scope::StackScope;
pub use service::{EnvVarService, FileSync, WriteOutcome};
pub use store::{JsonFileStore, MemoryStore, VariableStore};
