//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{self, Context};
use cib_reconcile::defaults::{self, CIBADMIN_ENV, CIB_FILE_ENV};
use cib_reconcile::output::{ColorChoice, OutputConfig, OutputFormat};

/// cib-reconcile - Bring Pacemaker configuration objects to a requested state
#[derive(Parser, Debug)]
#[command(name = "cib-reconcile")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Compute and report changes without committing them
    #[arg(long, short = 'n', visible_alias = "dry-run", global = true)]
    check: bool,

    /// Path of the cibadmin binary
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = CIBADMIN_ENV,
        default_value_os_t = defaults::default_cibadmin()
    )]
    cibadmin: PathBuf,

    /// Operate on a configuration document file instead of the live cluster
    #[arg(long, global = true, value_name = "PATH", env = CIB_FILE_ENV)]
    cib_file: Option<PathBuf>,

    /// Report format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Colorize output
    #[arg(
        long,
        global = true,
        value_name = "WHEN",
        value_enum,
        default_value_t = ColorChoice::Auto
    )]
    color: ColorChoice,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile a primitive resource and its clone/master wrapper
    Resource(commands::resource::ResourceArgs),

    /// Reconcile a resource group
    Group(commands::group::GroupArgs),

    /// Reconcile a colocation constraint
    Colocation(commands::colocation::ColocationArgs),

    /// Reconcile an order constraint between two resources
    Order(commands::order::OrderArgs),

    /// Reconcile an order constraint over resource sets
    OrderSet(commands::order_set::OrderSetArgs),

    /// Reconcile a location constraint
    Location(commands::location::LocationArgs),

    /// Reconcile cluster properties
    Property(commands::property::PairsArgs),

    /// Reconcile resource defaults
    ResourceDefault(commands::property::PairsArgs),

    /// Reconcile a list of requests read from a YAML or JSON file
    Apply(commands::apply::ApplyArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Value of the global `--log-level` flag.
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    fn context(&self) -> Context {
        Context {
            check: self.check,
            cibadmin: self.cibadmin.clone(),
            cib_file: self.cib_file.clone(),
            format: self.format,
            output: OutputConfig::from_env_and_flag(self.color),
        }
    }

    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let context = self.context();
        match self.command {
            Commands::Resource(args) => commands::resource::execute(args, &context),
            Commands::Group(args) => commands::group::execute(args, &context),
            Commands::Colocation(args) => commands::colocation::execute(args, &context),
            Commands::Order(args) => commands::order::execute(args, &context),
            Commands::OrderSet(args) => commands::order_set::execute(args, &context),
            Commands::Location(args) => commands::location::execute(args, &context),
            Commands::Property(args) => commands::property::execute_property(args, &context),
            Commands::ResourceDefault(args) => {
                commands::property::execute_resource_default(args, &context)
            }
            Commands::Apply(args) => commands::apply::execute(args, &context),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
