mod compare;
mod profile;
mod simulate;
mod usage;

use clap::{Parser, Subcommand};

pub use self::{compare::CompareArgs, profile::ProfileArgs, simulate::SimulateArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Estimate the annual cost of a single plan.
    #[clap(name = "simulate")]
    Simulate(Box<SimulateArgs>),

    /// Rank plans by their estimated annual cost and show the cheapest ones.
    #[clap(name = "compare")]
    Compare(Box<CompareArgs>),

    /// Generate a synthetic year of 5-minute usage intervals as CSV.
    #[clap(name = "profile")]
    Profile(Box<ProfileArgs>),
}
