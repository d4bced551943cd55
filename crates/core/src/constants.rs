//! Centralized constants for the stackenv workspace.

/// Sentinel value standing in for a secret in read responses and write
/// requests. Never a real stored value.
pub const MASK_PLACEHOLDER: &str = "***";

/// File name of the environment file inside a stack directory.
pub const ENV_FILE_NAME: &str = ".env";
