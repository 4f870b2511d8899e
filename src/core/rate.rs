use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::{
    core::{
        error::SimulationError,
        plan::{Rate, TariffPeriod},
        time::Moment,
    },
    quantity::energy::KilowattHours,
};

impl TariffPeriod {
    /// Select the single rate applicable at the moment.
    ///
    /// `daily_usage` is the energy already attributed to the day, not including the current interval.
    /// Capped tiers are tried from the lowest cap up, uncapped rates come last.
    pub fn resolve_rate(
        &self,
        moment: &Moment,
        daily_usage: KilowattHours,
    ) -> Result<&Rate, SimulationError> {
        let candidates = self
            .rates
            .iter()
            .filter(|rate| rate.time_windows.iter().any(|window| window.contains_moment(moment)))
            .sorted_by_key(|rate| OrderedFloat(rate.volume_limit.map_or(f64::INFINITY, |limit| limit.0)))
            .collect_vec();
        if candidates.is_empty() {
            return Err(SimulationError::NoRateMatch {
                date: moment.month_day(),
                day: moment.day,
                time: moment.time_of_day(),
            });
        }
        candidates
            .into_iter()
            .find(|rate| rate.volume_limit.is_none_or(|limit| daily_usage < limit))
            .ok_or_else(|| SimulationError::VolumeLimitExceeded {
                date: moment.month_day(),
                day: moment.day,
                daily_usage,
            })
    }
}
