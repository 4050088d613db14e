//! # Resource Command Implementation
//!
//! Reconciles one primitive resource. `--clone` and `--master` request the
//! matching wrapper; either may be given without a value.
//!
//! ```bash
//! cib-reconcile resource --name vip1 --type ocf:heartbeat:IPaddr2 \
//!     --params 'ip=192.0.2.10 cidr_netmask=24' \
//!     --op 'monitor interval=10s'
//! ```

use anyhow::Result;
use clap::Args;

use super::{attrs, run_one, Context};
use cib_reconcile::request::{Request, ResourceRequest, State};

/// Reconcile a primitive resource
#[derive(Args, Debug)]
pub struct ResourceArgs {
    /// Resource id
    #[arg(long)]
    pub name: String,

    /// Agent as class:provider:type or class:type
    #[arg(long = "type", value_name = "AGENT")]
    pub agent: Option<String>,

    /// Instance attributes (key=value ...)
    #[arg(long)]
    pub params: Option<String>,

    /// Meta attributes (key=value ...)
    #[arg(long)]
    pub meta: Option<String>,

    /// Operation: a name followed by key=value pairs (repeatable)
    #[arg(long, value_name = "OP")]
    pub op: Vec<String>,

    /// Wrap the resource in a clone with these options
    #[arg(long, value_name = "OPTIONS", num_args = 0..=1, default_missing_value = "")]
    pub clone: Option<String>,

    /// Wrap the resource in a master with these options
    #[arg(long, value_name = "OPTIONS", num_args = 0..=1, default_missing_value = "")]
    pub master: Option<String>,

    /// Target state
    #[arg(long, value_enum, default_value_t = State::Present)]
    pub state: State,

    /// Replace the resource even if it is already equivalent
    #[arg(long)]
    pub force: bool,
}

impl From<ResourceArgs> for Request {
    fn from(args: ResourceArgs) -> Self {
        Request::Resource(ResourceRequest {
            name: args.name,
            agent: args.agent,
            params: attrs(args.params),
            meta: attrs(args.meta),
            op: args.op.into_iter().map(Into::into).collect(),
            clone: attrs(args.clone),
            master: attrs(args.master),
            state: args.state,
            force: args.force,
        })
    }
}

/// Execute the `resource` command.
pub fn execute(args: ResourceArgs, context: &Context) -> Result<()> {
    run_one(args.into(), context)
}
