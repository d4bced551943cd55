//! Path helpers for the store file and stack directories.
//!
//! Responsibilities:
//! - Determine the store file location and the stacks root directory,
//!   honoring environment overrides.
//! - Build per-stack directory and env-file paths.
//!
//! Does NOT handle:
//! - File I/O (see `store` and `service`).

use std::path::{Path, PathBuf};

use stackenv_core::ENV_FILE_NAME;

use crate::error::StoreError;

/// Reads an environment variable, returning None if unset, empty, or
/// whitespace-only.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

/// Returns the store file path.
///
/// `STACKENV_STORE_PATH` takes precedence; otherwise the platform config
/// directory is used:
/// - Linux/macOS: `~/.config/stackenv/variables.json`
/// - Windows: `%AppData%\stackenv\variables.json`
pub fn default_store_path() -> Result<PathBuf, StoreError> {
    if let Some(path) = env_var_or_none("STACKENV_STORE_PATH") {
        return Ok(PathBuf::from(path));
    }

    let proj_dirs = directories::ProjectDirs::from("", "", "stackenv").ok_or_else(|| {
        StoreError::DirUnavailable("failed to determine project directories".to_string())
    })?;

    Ok(proj_dirs.config_dir().join("variables.json"))
}

/// Returns the root directory under which stack working directories live.
///
/// `STACKENV_STACKS_DIR` takes precedence; otherwise `stacks/` under the
/// platform data directory.
pub fn resolve_stacks_dir() -> Result<PathBuf, StoreError> {
    if let Some(dir) = env_var_or_none("STACKENV_STACKS_DIR") {
        return Ok(PathBuf::from(dir));
    }

    let proj_dirs = directories::ProjectDirs::from("", "", "stackenv").ok_or_else(|| {
        StoreError::DirUnavailable("failed to determine project directories".to_string())
    })?;

    Ok(proj_dirs.data_dir().join("stacks"))
}

/// Returns a stack's working directory under the stacks root.
pub fn stack_dir(stacks_dir: &Path, stack: &str) -> PathBuf {
    stacks_dir.join(stack)
}

/// Returns the env file path inside a stack directory.
pub fn env_file_path(stack_dir: &Path) -> PathBuf {
    stack_dir.join(ENV_FILE_NAME)
}
