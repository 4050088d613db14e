//! # Property and Resource-Default Command Implementations
//!
//! Both commands edit a well-known nvpair set and share their arguments.

use anyhow::Result;
use clap::Args;

use super::{run_one, Context};
use cib_reconcile::request::{PairsRequest, Request, State};

/// Arguments shared by `property` and `resource-default`
#[derive(Args, Debug)]
pub struct PairsArgs {
    /// Pairs to set, or with --state absent to remove (key=value ...)
    #[arg(long)]
    pub params: String,

    /// Target state (present or absent)
    #[arg(long, value_enum, default_value_t = State::Present)]
    pub state: State,
}

impl PairsArgs {
    fn into_request(self) -> PairsRequest {
        PairsRequest {
            params: self.params.into(),
            state: self.state,
        }
    }
}

/// Execute the `property` command.
pub fn execute_property(args: PairsArgs, context: &Context) -> Result<()> {
    run_one(Request::Property(args.into_request()), context)
}

/// Execute the `resource-default` command.
pub fn execute_resource_default(args: PairsArgs, context: &Context) -> Result<()> {
    run_one(Request::ResourceDefault(args.into_request()), context)
}
