use chrono::TimeDelta;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::{
    core::{
        interval::SimulatedInterval,
        plan::Plan,
        simulator::{CostReport, Simulator},
    },
    prelude::*,
};

/// Simulation outcome of one plan in a comparison.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPlan {
    pub plan_id: String,
    pub brand_name: String,
    pub display_name: String,
    pub simulation_result: CostReport,
}

/// Simulate every plan over the same usage and keep the `top_n` cheapest.
///
/// A plan that cannot be simulated is skipped with a warning, so that one broken plan does not spoil the comparison.
#[instrument(skip_all, fields(n_plans = plans.len(), n_intervals = intervals.len()))]
pub fn compare(
    plans: &[Plan],
    intervals: &[SimulatedInterval],
    interval_duration: Option<TimeDelta>,
    top_n: usize,
) -> Vec<RankedPlan> {
    let ranking = plans
        .iter()
        .filter_map(|plan| {
            match Simulator::builder()
                .plan(plan)
                .maybe_interval_duration(interval_duration)
                .build()
                .simulate(intervals)
            {
                Ok(report) => Some(RankedPlan {
                    plan_id: plan.id.clone(),
                    brand_name: plan.brand.clone(),
                    display_name: plan.display_name.clone(),
                    simulation_result: report,
                }),
                Err(error) => {
                    warn!(plan_id = %plan.id, %error, "skipping the plan");
                    None
                }
            }
        })
        .sorted_by_key(|ranked| OrderedFloat(ranked.simulation_result.total_cost.0))
        .take(top_n)
        .collect_vec();
    info!(n_ranked = ranking.len(), "compared");
    ranking
}
