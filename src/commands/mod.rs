//! # CLI Command Implementations
//!
//! One subcommand per object kind, plus `apply` for batches and
//! `completions`.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`. Its fields map one to one onto the fields of the
//!   matching request.
//! - An `execute` function that turns the parsed `Args` into a [`Request`]
//!   and hands it to [`run`].
//!
//! [`run`] owns everything the commands share: choosing the document
//! accessor, driving the reconciler, printing one report per request, and
//! failing the process when a request failed.

pub mod apply;
pub mod colocation;
pub mod completions;
pub mod group;
pub mod location;
pub mod order;
pub mod order_set;
pub mod property;
pub mod resource;

use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use cib_reconcile::cib::{CibAccessor, CibadminAccessor, FileAccessor};
use cib_reconcile::output::{render, OutputConfig, OutputFormat};
use cib_reconcile::reconcile::Reconciler;
use cib_reconcile::request::Request;

/// Settings from the global flags.
#[derive(Debug, Clone)]
pub struct Context {
    pub check: bool,
    pub cibadmin: PathBuf,
    pub cib_file: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: OutputConfig,
}

impl Context {
    fn accessor(&self) -> Box<dyn CibAccessor> {
        match &self.cib_file {
            Some(path) => {
                debug!("using document file {}", path.display());
                Box::new(FileAccessor::new(path))
            }
            None => Box::new(CibadminAccessor::new(&self.cibadmin)),
        }
    }
}

/// Reconcile `requests` in order and print a report for each.
///
/// Stops at the first failed request unless `keep_going` is set. Returns an
/// error if any request failed.
pub fn run(requests: &[Request], context: &Context, keep_going: bool) -> Result<()> {
    let accessor = context.accessor();
    let reconciler = Reconciler::new(accessor.as_ref()).check_mode(context.check);

    let mut failed = 0usize;
    for request in requests {
        let report = reconciler.reconcile(request);
        println!("{}", render(&report, context.format, &context.output)?);
        if report.is_failed() {
            failed += 1;
            if !keep_going {
                break;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} requests failed", failed, requests.len());
    }
    Ok(())
}

/// Reconcile a single request.
pub fn run_one(request: Request, context: &Context) -> Result<()> {
    run(&[request], context, false)
}

/// Wrap an optional flag value as an attribute input.
pub(crate) fn attrs(value: Option<String>) -> Option<cib_reconcile::attrs::AttrInput> {
    value.map(Into::into)
}
