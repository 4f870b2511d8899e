use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::usage::UsageArgs,
    core::simulator::Simulator,
    input::read_plans,
    prelude::*,
    tables::build_breakdown_table,
};

#[derive(Parser)]
pub struct SimulateArgs {
    /// JSON or TOML file with the plan.
    #[clap(long = "plan", env = "PLAN_PATH")]
    pub plan_path: PathBuf,

    /// Plan to pick when the file contains several, the first one by default.
    #[clap(long, env = "PLAN_ID")]
    pub plan_id: Option<String>,

    #[clap(flatten)]
    pub usage: UsageArgs,

    /// Print the report as JSON instead of a table.
    #[clap(long)]
    pub json: bool,
}

impl SimulateArgs {
    #[instrument(skip_all)]
    pub fn run(&self) -> Result {
        let plans = read_plans(&self.plan_path)?;
        let plan = match &self.plan_id {
            Some(plan_id) => plans
                .iter()
                .find(|plan| &plan.id == plan_id)
                .with_context(|| format!("plan `{plan_id}` is not found"))?,
            None => plans.first().context("no plans to simulate")?,
        };
        let usage = self.usage.load()?;

        let report = Simulator::builder()
            .plan(plan)
            .maybe_interval_duration(usage.interval_duration)
            .build()
            .simulate(&usage.intervals)
            .with_context(|| format!("failed to simulate `{}`", plan.id))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{} {}", plan.brand, plan.display_name);
            println!("{}", build_breakdown_table(&report));
        }
        Ok(())
    }
}
