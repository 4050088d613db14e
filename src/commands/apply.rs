//! # Apply Command Implementation
//!
//! Reads a list of requests from a YAML (or JSON) file and reconciles them
//! one after another. Each entry carries its object kind in `kind`:
//!
//! ```yaml
//! - kind: resource
//!   name: vip1
//!   type: ocf:heartbeat:IPaddr2
//!   params: ip=192.0.2.10
//! - kind: location
//!   resource: vip1
//!   node: control1
//!   score: "100"
//! ```
//!
//! Every request is an independent reconciliation with fresh state. The run
//! stops at the first failed request unless `--keep-going` is given.

use anyhow::{Context as _, Result};
use clap::Args;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use super::{run, Context};
use cib_reconcile::request::Request;

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Path to the request file
    #[arg(short, long, value_name = "FILE")]
    pub file: PathBuf,

    /// Continue with the remaining requests after a failure
    #[arg(long)]
    pub keep_going: bool,
}

/// Parse the request list in `path`.
pub fn load_requests(path: &Path) -> Result<Vec<Request>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file: {}", path.display()))?;
    let requests: Vec<Request> = serde_yaml::from_str(&text)
        .with_context(|| format!("Failed to parse request file: {}", path.display()))?;
    Ok(requests)
}

/// Execute the apply command
pub fn execute(args: ApplyArgs, context: &Context) -> Result<()> {
    let requests = load_requests(&args.file)?;
    info!(
        "applying {} requests from {}",
        requests.len(),
        args.file.display()
    );
    run(&requests, context, args.keep_going)
}
