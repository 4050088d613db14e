//! # Order Command Implementation

use anyhow::Result;
use clap::Args;

use super::{attrs, run_one, Context};
use cib_reconcile::request::{Action, OrderRequest, Request, State};

/// Reconcile an order constraint between two resources
#[derive(Args, Debug)]
pub struct OrderArgs {
    /// Resource acted on first
    #[arg(long)]
    pub resource1: String,

    /// Action on the first resource (default start)
    #[arg(long, value_enum)]
    pub resource1_action: Option<Action>,

    /// Resource acted on second
    #[arg(long)]
    pub resource2: String,

    /// Action on the second resource (default start)
    #[arg(long, value_enum)]
    pub resource2_action: Option<Action>,

    /// Extra constraint attributes such as kind (key=value ...)
    #[arg(long)]
    pub params: Option<String>,

    /// Target state
    #[arg(long, value_enum, default_value_t = State::Present)]
    pub state: State,

    /// Replace the constraint even if it is already equivalent
    #[arg(long)]
    pub force: bool,
}

impl From<OrderArgs> for Request {
    fn from(args: OrderArgs) -> Self {
        Request::Order(OrderRequest {
            resource1: args.resource1,
            resource1_action: args.resource1_action,
            resource2: args.resource2,
            resource2_action: args.resource2_action,
            params: attrs(args.params),
            state: args.state,
            force: args.force,
        })
    }
}

/// Execute the `order` command.
pub fn execute(args: OrderArgs, context: &Context) -> Result<()> {
    run_one(args.into(), context)
}
