//! # Order-Set Command Implementation
//!
//! Each `--set` is one resource set, members separated by commas:
//!
//! ```bash
//! cib-reconcile order-set --name db-then-web \
//!     --set galera=master --set vip1,haproxy
//! ```

use anyhow::Result;
use clap::Args;

use super::{attrs, run_one, Context};
use cib_reconcile::request::{OrderSetRequest, Request, ResourceSets, State};

/// Reconcile an order constraint over resource sets
#[derive(Args, Debug)]
pub struct OrderSetArgs {
    /// Constraint id
    #[arg(long)]
    pub name: String,

    /// One resource set, members as NAME[=ROLE] separated by commas (repeatable)
    #[arg(long = "set", value_name = "MEMBERS")]
    pub resource_sets: Vec<String>,

    /// Constraint attributes (key=value ...)
    #[arg(long)]
    pub params: Option<String>,

    /// Attributes applied to every resource set (key=value ...)
    #[arg(long)]
    pub set_options: Option<String>,

    /// Target state
    #[arg(long, value_enum, default_value_t = State::Present)]
    pub state: State,

    /// Replace the constraint even if it is already equivalent
    #[arg(long)]
    pub force: bool,
}

fn split_sets(sets: Vec<String>) -> ResourceSets {
    ResourceSets::Nested(
        sets.iter()
            .map(|set| {
                set.split(',')
                    .map(str::trim)
                    .filter(|member| !member.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .collect(),
    )
}

impl From<OrderSetArgs> for Request {
    fn from(args: OrderSetArgs) -> Self {
        Request::OrderSet(OrderSetRequest {
            name: args.name,
            resource_sets: split_sets(args.resource_sets),
            params: attrs(args.params),
            set_options: attrs(args.set_options),
            state: args.state,
            force: args.force,
        })
    }
}

/// Execute the `order-set` command.
pub fn execute(args: OrderSetArgs, context: &Context) -> Result<()> {
    run_one(args.into(), context)
}
