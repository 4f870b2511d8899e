//! Plans and interval sequences shared by the tests.

use chrono::{NaiveDate, NaiveTime, TimeDelta};

use crate::{
    core::{
        interval::SimulatedInterval,
        plan::{
            Discount,
            DiscountCategory,
            DiscountType,
            Fee,
            FeeType,
            Plan,
            Rate,
            RateType,
            TariffPeriod,
        },
        window::TimeWindow,
    },
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

fn window(start: &str, end: &str) -> TimeWindow {
    TimeWindow::builder().start_time(start.parse().unwrap()).end_time(end.parse().unwrap()).build()
}

/// Whole year, one uncapped rate around the clock.
pub fn flat_period(daily_supply_charge: f64, unit_price: f64) -> TariffPeriod {
    TariffPeriod::builder()
        .start_date("01-01".parse().unwrap())
        .end_date("12-31".parse().unwrap())
        .daily_supply_charge(Cost::from(daily_supply_charge))
        .rates(vec![
            Rate::builder()
                .unit_price(KilowattHourRate::from(unit_price))
                .time_windows(vec![window("00:00", "00:00")])
                .build(),
        ])
        .build()
}

/// Two-rate block tariff with a near-free midday window.
pub fn tiered_period() -> TariffPeriod {
    let peak_windows = vec![window("14:00", "00:00"), window("00:00", "10:00")];
    TariffPeriod::builder()
        .start_date("01-01".parse().unwrap())
        .end_date("12-31".parse().unwrap())
        .daily_supply_charge(Cost::from(0.96))
        .rates(vec![
            Rate::builder()
                .unit_price(KilowattHourRate::from(0.28))
                .time_windows(peak_windows.clone())
                .build(),
            Rate::builder()
                .unit_price(KilowattHourRate::from(0.258))
                .volume_limit(KilowattHours::from(15.0))
                .time_windows(peak_windows)
                .build(),
            Rate::builder()
                .kind(RateType::OffPeak)
                .unit_price(KilowattHourRate::from(0.000_001))
                .time_windows(vec![window("10:00", "14:00")])
                .build(),
        ])
        .build()
}

/// Residential two-rate plan with a connection fee and a pay-on-time discount.
pub fn two_rate_plan() -> Plan {
    Plan::builder()
        .id("GLO724613MR@VEC")
        .brand("GloBird Energy")
        .display_name("Combo FOUR4FREE Residential (Two Rate)")
        .tariff_periods(vec![tiered_period()])
        .fees(vec![Fee::Fixed {
            kind: FeeType::Connection,
            amount: Cost::from(15.0),
            description: "Connection".to_owned(),
        }])
        .discounts(vec![
            Discount::builder()
                .kind(DiscountType::Conditional)
                .category(DiscountCategory::PayOnTime)
                .display_name("Prompt Payment Discount")
                .rate(0.05)
                .build(),
        ])
        .build()
}

/// Plan with a single flat rate and nothing else.
pub fn flat_plan(id: &str, daily_supply_charge: f64, unit_price: f64) -> Plan {
    Plan::builder()
        .id(id)
        .tariff_periods(vec![flat_period(daily_supply_charge, unit_price)])
        .build()
}

/// Constant consumption at every step from midnight of `from` until midnight of `until` (exclusive).
pub fn constant_intervals(
    from: NaiveDate,
    until: NaiveDate,
    step: TimeDelta,
    kwh: f64,
) -> Vec<SimulatedInterval> {
    let end = until.and_time(NaiveTime::MIN);
    let mut start = from.and_time(NaiveTime::MIN);
    let mut intervals = Vec::new();
    while start < end {
        intervals.push(SimulatedInterval::builder().start(start).kwh(kwh).build());
        start += step;
    }
    intervals
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
