use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::usage::UsageArgs,
    comparison,
    input::read_plans,
    prelude::*,
    tables::build_ranking_table,
};

#[derive(Parser)]
pub struct CompareArgs {
    /// JSON or TOML file with the plans to compare.
    #[clap(long = "plans", env = "PLAN_PATH")]
    pub plan_path: PathBuf,

    /// Number of the cheapest plans to show.
    #[clap(long = "top", env = "TOP_N", default_value = "3")]
    pub top_n: usize,

    #[clap(flatten)]
    pub usage: UsageArgs,

    /// Print the ranking as JSON instead of a table.
    #[clap(long)]
    pub json: bool,
}

impl CompareArgs {
    #[instrument(skip_all, fields(top_n = self.top_n))]
    pub fn run(&self) -> Result {
        let plans = read_plans(&self.plan_path)?;
        let usage = self.usage.load()?;
        let ranking =
            comparison::compare(&plans, &usage.intervals, usage.interval_duration, self.top_n);
        if ranking.is_empty() {
            bail!("none of the {} plans could be simulated", plans.len());
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&ranking)?);
        } else {
            println!("{}", build_ranking_table(&ranking));
        }
        Ok(())
    }
}
