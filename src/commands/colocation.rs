//! # Colocation Command Implementation
//!
//! Either two `--resource` values (each optionally `name=role`) or the
//! `--master`/`--slave` pair.

use anyhow::Result;
use clap::Args;

use super::{attrs, run_one, Context};
use cib_reconcile::defaults::DEFAULT_SCORE;
use cib_reconcile::request::{ColocationRequest, Request, State};

/// Reconcile a colocation constraint
#[derive(Args, Debug)]
pub struct ColocationArgs {
    /// Resource that runs in the master role
    #[arg(long, value_name = "NAME", conflicts_with = "resource", requires = "slave")]
    pub master: Option<String>,

    /// Resource that runs in the slave role
    #[arg(long, value_name = "NAME", conflicts_with = "resource", requires = "master")]
    pub slave: Option<String>,

    /// Colocated resource, optionally NAME=ROLE (exactly two)
    #[arg(long, value_name = "NAME[=ROLE]", value_delimiter = ',')]
    pub resource: Vec<String>,

    /// Constraint score
    #[arg(long, allow_hyphen_values = true, default_value = DEFAULT_SCORE)]
    pub score: String,

    /// Extra constraint attributes (key=value ...)
    #[arg(long)]
    pub option: Option<String>,

    /// Target state
    #[arg(long, value_enum, default_value_t = State::Present)]
    pub state: State,

    /// Replace the constraint even if it is already equivalent
    #[arg(long)]
    pub force: bool,
}

impl From<ColocationArgs> for Request {
    fn from(args: ColocationArgs) -> Self {
        Request::Colocation(ColocationRequest {
            master: args.master,
            slave: args.slave,
            resource: args.resource,
            score: args.score,
            option: attrs(args.option),
            state: args.state,
            force: args.force,
        })
    }
}

/// Execute the `colocation` command.
pub fn execute(args: ColocationArgs, context: &Context) -> Result<()> {
    run_one(args.into(), context)
}
