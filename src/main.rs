//! # cib-reconcile CLI
//!
//! This is the binary entry point for the `cib-reconcile` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Initialising logging from `--log-level` (overridable with `RUST_LOG`).
//! - Running the selected command and turning failed reconciliations into a
//!   non-zero exit status.
//!
//! The reconciliation engine lives in the `cib_reconcile` library crate; the
//! binary is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    env_logger::Builder::new()
        .parse_filters(cli.log_level())
        .parse_default_env()
        .init();
    cli.execute()
}
