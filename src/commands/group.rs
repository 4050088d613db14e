//! # Group Command Implementation

use anyhow::Result;
use clap::Args;

use super::{attrs, run_one, Context};
use cib_reconcile::request::{GroupRequest, Request, State};

/// Reconcile a resource group
#[derive(Args, Debug)]
pub struct GroupArgs {
    /// Group id
    #[arg(long)]
    pub name: String,

    /// Member primitive, in order (repeatable or comma separated)
    #[arg(long, value_name = "NAME", value_delimiter = ',')]
    pub resource: Vec<String>,

    /// Meta attributes (key=value ...)
    #[arg(long)]
    pub meta: Option<String>,

    /// Target state
    #[arg(long, value_enum, default_value_t = State::Present)]
    pub state: State,

    /// Replace the group even if it is already equivalent
    #[arg(long)]
    pub force: bool,
}

impl From<GroupArgs> for Request {
    fn from(args: GroupArgs) -> Self {
        Request::Group(GroupRequest {
            name: args.name,
            resource: args.resource,
            meta: attrs(args.meta),
            state: args.state,
            force: args.force,
        })
    }
}

/// Execute the `group` command.
pub fn execute(args: GroupArgs, context: &Context) -> Result<()> {
    run_one(args.into(), context)
}
