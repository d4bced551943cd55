//! stackenv - manage stack environment variables from the command line.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Wire the variable store and stack paths into the service layer.
//! - Render reconciled views in table or JSON form.
//!
//! Does NOT handle:
//! - Reconciliation or merge policy (see `stackenv-core`).
//! - Store persistence mechanics (see `stackenv-service`).
//!
//! Invariants:
//! - Logging goes to stderr so stdout stays parseable.
//! - `set`/`unset` always submit the full variable set; the service's
//!   delete-by-omission contract is never exposed to a partial update.

mod args;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use args::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    commands::run(cli)
}
