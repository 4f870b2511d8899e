use std::collections::BTreeMap;

use chrono::TimeDelta;
use ordered_float::OrderedFloat;

use crate::{
    core::{
        calendar::{TimeOfDay, YearMonth},
        period::find_period,
        plan::DemandChargePeriod,
        time::Moment,
    },
    prelude::*,
    quantity::{
        cost::Cost,
        energy::KilowattHours,
        power::Kilowatts,
        rate::KilowattRate,
    },
};

/// Identifies a demand charge within the billing month.
///
/// Charges sharing both the price and the start time are tracked as one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct DemandKey {
    amount: OrderedFloat<f64>,
    start_time: TimeOfDay,
}

/// Highest average power observed within each demand charge window during the current billing month.
#[derive(Clone, Debug, Default)]
pub struct DemandTracker {
    peaks: BTreeMap<DemandKey, Kilowatts>,
}

impl DemandTracker {
    /// Account the interval against the first demand charge active at the moment, if any.
    pub fn track(
        &mut self,
        periods: &[DemandChargePeriod],
        moment: &Moment,
        energy: KilowattHours,
        duration: TimeDelta,
    ) {
        let Some(period) = find_period(periods, moment.month_day()) else {
            return;
        };
        let Some(charge) = period.demand_charges.iter().find(|charge| charge.contains(moment)) else {
            return;
        };
        let power = energy / duration;
        let key = DemandKey { amount: OrderedFloat(charge.amount.0), start_time: charge.start_time };
        let peak = self.peaks.entry(key).or_default();
        *peak = peak.max(power);
        trace!(%power, peak = %*peak, start_time = %charge.start_time, "tracked");
    }

    /// Sum of `peak × price × days in month` over the tracked charges.
    pub fn monthly_cost(&self, month: YearMonth) -> Cost {
        let n_days = f64::from(month.days_in_month());
        self.peaks
            .iter()
            .map(|(key, peak)| *peak * KilowattRate::from(key.amount.0) * n_days)
            .sum()
    }

    /// Forget the peaks at the billing month boundary.
    pub fn clear(&mut self) {
        self.peaks.clear();
    }
}
