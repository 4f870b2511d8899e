use bon::Builder;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::{
    core::{
        calendar::YearMonth,
        demand::DemandTracker,
        error::SimulationError,
        interval::SimulatedInterval,
        period::find_period,
        plan::{Plan, TariffPeriod},
        time::Moment,
    },
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours},
};

/// Annual cost estimate of a single plan.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostReport {
    pub total_cost: Cost,
    pub total_kwh: KilowattHours,
    pub monthly_breakdown: Vec<MonthlyBreakdown>,
    pub discounts: Vec<AppliedDiscount>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBreakdown {
    pub month: YearMonth,
    pub usage: KilowattHours,

    /// Energy and supply charges.
    pub cost: Cost,

    pub demand_cost: Cost,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_fee: Option<Cost>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDiscount {
    pub display_name: String,
    pub rate: f64,

    /// Deducted from the running total.
    pub amount: Cost,
}

#[derive(Builder)]
pub struct Simulator<'a> {
    plan: &'a Plan,

    /// Duration of every interval, used to convert energy into power for the demand charges.
    #[builder(default = TimeDelta::minutes(5))]
    interval_duration: TimeDelta,
}

impl<'a> Simulator<'a> {
    /// Walk the intervals once in chronological order and price them against the plan.
    ///
    /// Any failure is fatal for the plan: there is no rate to fall back to.
    #[instrument(skip_all, fields(plan_id = %self.plan.id, n_intervals = intervals.len()))]
    pub fn simulate(
        self,
        intervals: &[SimulatedInterval],
    ) -> Result<CostReport, SimulationError> {
        let mut totals = Totals::default();
        let mut previous_start: Option<NaiveDateTime> = None;
        let mut current_day: Option<(NaiveDate, &'a TariffPeriod)> = None;
        let mut current_month: Option<MonthAccumulator> = None;
        let mut daily_usage = KilowattHours::ZERO;
        let mut demand_tracker = DemandTracker::default();
        let mut monthly_breakdown = Vec::new();

        for interval in intervals {
            if let Some(previous_start) = previous_start
                && interval.start <= previous_start
            {
                return Err(SimulationError::UnorderedInterval {
                    previous: previous_start.to_string(),
                    start: interval.start.to_string(),
                });
            }
            previous_start = Some(interval.start);

            let moment = Moment::from(interval.start);
            let month = YearMonth::of(moment.date());

            // The new day's supply charge lands in the running month before it gets closed.
            let tariff_period = match current_day {
                Some((date, tariff_period)) if date == moment.date() => tariff_period,
                _ => {
                    let tariff_period = find_period(&self.plan.tariff_periods, moment.month_day())
                        .ok_or_else(|| SimulationError::NoTariffPeriodMatch(moment.month_day()))?;
                    totals.cost += tariff_period.daily_supply_charge;
                    current_month.get_or_insert_with(|| MonthAccumulator::new(month)).cost +=
                        tariff_period.daily_supply_charge;
                    daily_usage = KilowattHours::ZERO;
                    current_day = Some((moment.date(), tariff_period));
                    tariff_period
                }
            };

            if current_month.as_ref().is_some_and(|accumulator| accumulator.month != month)
                && let Some(closing) = current_month.take()
            {
                monthly_breakdown.push(closing.close(&mut demand_tracker, &mut totals));
            }
            let accumulator = current_month.get_or_insert_with(|| MonthAccumulator::new(month));

            let rate = tariff_period.resolve_rate(&moment, daily_usage)?;
            let usage_cost = interval.kwh * rate.unit_price;
            totals.cost += usage_cost;
            totals.kwh += interval.kwh;
            accumulator.cost += usage_cost;
            accumulator.usage += interval.kwh;
            daily_usage += interval.kwh;

            demand_tracker.track(
                &self.plan.demand_charges,
                &moment,
                interval.kwh,
                self.interval_duration,
            );
        }

        if let Some(closing) = current_month.take() {
            monthly_breakdown.push(closing.close(&mut demand_tracker, &mut totals));
        }

        if let Some(connection_fee) = self.plan.connection_fee() {
            totals.cost += connection_fee;
            if let Some(first) = monthly_breakdown.first_mut() {
                first.connection_fee = Some(connection_fee);
            }
        }

        let discounts = self
            .plan
            .applicable_discounts()
            .map(|discount| {
                let amount = totals.cost * discount.rate;
                totals.cost -= amount;
                AppliedDiscount {
                    display_name: discount.display_name.clone(),
                    rate: discount.rate,
                    amount: amount.round_to_cents(),
                }
            })
            .collect();

        info!(total_cost = %totals.cost, total_kwh = %totals.kwh, "simulated");
        Ok(CostReport {
            total_cost: totals.cost.round_to_cents(),
            total_kwh: totals.kwh.round_to_cents(),
            monthly_breakdown,
            discounts,
        })
    }
}

#[derive(Default)]
struct Totals {
    cost: Cost,
    kwh: KilowattHours,
}

/// Running figures of the billing month being simulated.
struct MonthAccumulator {
    month: YearMonth,
    usage: KilowattHours,
    cost: Cost,
}

impl MonthAccumulator {
    const fn new(month: YearMonth) -> Self {
        Self { month, usage: KilowattHours::ZERO, cost: Cost::ZERO }
    }

    /// Charge the demand peaks of the month and reset the tracker for the next one.
    fn close(self, demand_tracker: &mut DemandTracker, totals: &mut Totals) -> MonthlyBreakdown {
        let demand_cost = demand_tracker.monthly_cost(self.month);
        demand_tracker.clear();
        totals.cost += demand_cost;
        debug!(month = %self.month, usage = %self.usage, cost = %self.cost, %demand_cost, "closed");
        MonthlyBreakdown {
            month: self.month,
            usage: self.usage.round_to_cents(),
            cost: self.cost.round_to_cents(),
            demand_cost: demand_cost.round_to_cents(),
            connection_fee: None,
        }
    }
}
