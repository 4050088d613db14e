//! # Location Command Implementation

use anyhow::Result;
use clap::Args;

use super::{run_one, Context};
use cib_reconcile::defaults::DEFAULT_SCORE;
use cib_reconcile::request::{LocationRequest, Request, State};

/// Reconcile a location constraint
#[derive(Args, Debug)]
pub struct LocationArgs {
    /// Constrained resource
    #[arg(long)]
    pub resource: String,

    /// Cluster node (uname)
    #[arg(long)]
    pub node: String,

    /// Constraint score
    #[arg(long, allow_hyphen_values = true, default_value = DEFAULT_SCORE)]
    pub score: String,

    /// Target state
    #[arg(long, value_enum, default_value_t = State::Present)]
    pub state: State,

    /// Replace the constraint even if it is already equivalent
    #[arg(long)]
    pub force: bool,
}

impl From<LocationArgs> for Request {
    fn from(args: LocationArgs) -> Self {
        Request::Location(LocationRequest {
            resource: args.resource,
            node: args.node,
            score: args.score,
            state: args.state,
            force: args.force,
        })
    }
}

/// Execute the `location` command.
pub fn execute(args: LocationArgs, context: &Context) -> Result<()> {
    run_one(args.into(), context)
}
