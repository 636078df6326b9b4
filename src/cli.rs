mod burrow;
mod compare;
mod heartbeat;
mod octopus;
mod watch;

use clap::{Parser, Subcommand};

pub use self::{burrow::BurrowArgs, compare::CompareArgs, watch::WatchArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare today's cost across the plans once.
    #[clap(name = "compare")]
    Compare(Box<CompareArgs>),

    /// Keep comparing on a fixed interval.
    #[clap(name = "watch")]
    Watch(Box<WatchArgs>),

    /// Development tools.
    #[clap(name = "burrow")]
    Burrow(Box<BurrowArgs>),
}
