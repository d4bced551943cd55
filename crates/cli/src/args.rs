//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `commands` module).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stackenv")]
#[command(about = "Manage stack environment variables across the store and .env files", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  stackenv list web\n  stackenv set web DATABASE_URL postgres://localhost/app\n  stackenv set web API_KEY k-123 --secret\n  stackenv --env 3 list web --output json\n  stackenv apply web --file vars.json\n"
)]
pub struct Cli {
    /// Path to the variable store file
    #[arg(long, global = true, env = "STACKENV_STORE_PATH", value_name = "FILE")]
    pub store_path: Option<PathBuf>,

    /// Root directory containing stack working directories
    #[arg(long, global = true, env = "STACKENV_STACKS_DIR", value_name = "DIR")]
    pub stacks_dir: Option<PathBuf>,

    /// Environment id scoping the variable set (omit for the default scope)
    #[arg(long, global = true, value_name = "ID")]
    pub env: Option<i64>,

    /// Output format (table, json)
    #[arg(short, long, global = true, default_value = "table")]
    pub output: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the reconciled variables for a stack (secrets masked)
    List {
        /// Stack name
        stack: String,
    },
    /// Print one variable's value from the reconciled view
    Get {
        /// Stack name
        stack: String,
        /// Variable name
        key: String,
    },
    /// Add or update one variable
    ///
    /// Reads the current view, upserts the entry, and submits the full
    /// set, so other variables are left untouched.
    Set {
        /// Stack name
        stack: String,
        /// Variable name
        key: String,
        /// Variable value
        value: String,
        /// Mark the variable as a secret (masked in all read output)
        #[arg(long)]
        secret: bool,
    },
    /// Remove one variable
    Unset {
        /// Stack name
        stack: String,
        /// Variable name
        key: String,
    },
    /// Replace the whole variable set from a JSON array
    ///
    /// Reads `[{"key": ..., "value": ..., "isSecret": ...}]` from --file
    /// or stdin. Keys absent from the input are DELETED from the store
    /// and from the stack's .env file; always provide the complete set.
    Apply {
        /// Stack name
        stack: String,
        /// JSON file to read (defaults to stdin)
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },
}
