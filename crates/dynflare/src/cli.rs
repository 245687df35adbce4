//! Command-line interface definition.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure.
#[derive(Parser, Debug)]
#[command(
    name = "dynflare",
    version,
    about = "Keep Cloudflare DNS records pointed at this host's public IP"
)]
pub struct Cli {
    /// The configuration file to use.
    #[arg(short, long)]
    pub config: PathBuf,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Point the configured records at the current public IP.
    Update(UpdateArgs),

    /// List the zones on the Cloudflare account.
    Domains,

    /// List the records of every zone on the account.
    Records,
}

/// Arguments for the update command.
#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Detect a change but write nothing (implies debug logging).
    #[arg(long)]
    pub dry_run: bool,

    /// Exit 3 when records were updated and 4 when a dry run skipped an update.
    #[arg(long)]
    pub detailed_exitcode: bool,
}

impl Cli {
    /// Whether this invocation is a dry run
    pub fn is_dry_run(&self) -> bool {
        matches!(&self.command, Command::Update(args) if args.dry_run)
    }
}
