use bon::Builder;
use chrono::{Datelike, NaiveDate, NaiveTime, TimeDelta};

use crate::{
    core::interval::SimulatedInterval,
    prelude::*,
    quantity::{energy::KilowattHours, power::Kilowatts},
};

const N_DAYS: usize = 365;
const N_INTERVALS_PER_HOUR: u16 = 12;

const AVERAGE_DAYS_PER_MONTH: f64 = 30.4;

/// Consumption multipliers, January to December.
const SEASONAL_MULTIPLIERS: [f64; 12] =
    [1.13, 0.96, 0.96, 0.87, 0.87, 1.04, 1.13, 1.04, 0.87, 0.96, 1.04, 1.13];

/// Daily solar generation per kilowatt of panels.
const SOLAR_DAILY_YIELD: f64 = 4.0;

/// Generation multipliers, January to December.
const SOLAR_SEASONAL_FACTORS: [f64; 12] =
    [1.3, 1.2, 1.1, 0.9, 0.7, 0.6, 0.6, 0.8, 1.0, 1.1, 1.2, 1.3];

/// Daylight bell curve, 06:00 through 18:59.
#[rustfmt::skip]
const SOLAR_HOURLY_WEIGHTS: [f64; 24] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    0.02, 0.08, 0.25, 0.5, 0.75, 0.95, 1.0, 0.95, 0.75, 0.5, 0.25, 0.08, 0.02,
    0.0, 0.0, 0.0, 0.0, 0.0,
];

/// Typical household consumption shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ProfileType {
    /// Empty house during the day, sharp evening peak.
    #[value(alias = "HOME_EVENING")]
    HomeEvening,

    /// Moderate usage throughout the day with a softer evening peak.
    #[value(alias = "HOME_ALL_DAY")]
    HomeAllDay,

    /// Grid import of a household whose panels cover the midday.
    #[value(alias = "SOLAR_HOUSEHOLD")]
    SolarHousehold,

    /// Evening peak plus overnight car charging.
    #[value(alias = "EV_HOUSEHOLD")]
    EvHousehold,
}

impl ProfileType {
    /// Relative consumption for each hour of the day.
    #[rustfmt::skip]
    pub const fn hourly_weights(self) -> [f64; 24] {
        match self {
            Self::HomeEvening => [
                0.2, 0.2, 0.2, 0.2, 0.2, 0.3,
                0.8, 1.2, 0.8,
                0.2, 0.2, 0.2, 0.2, 0.2, 0.2,
                0.3, 0.8,
                1.8, 2.0, 2.0, 1.8,
                1.0, 0.6, 0.4,
            ],
            Self::HomeAllDay => [
                0.3, 0.3, 0.3, 0.3, 0.3, 0.4,
                0.8, 1.0, 1.1,
                1.2, 1.2, 1.2, 1.2, 1.2, 1.2,
                1.2, 1.3,
                1.5, 1.6, 1.5, 1.4,
                1.0, 0.7, 0.5,
            ],
            Self::SolarHousehold => [
                0.3, 0.3, 0.3, 0.3, 0.3, 0.4,
                0.8, 0.8, 0.5,
                0.1, 0.0, 0.0, 0.0, 0.0, 0.0,
                0.1, 0.4,
                1.8, 2.0, 2.0, 1.8,
                1.0, 0.6, 0.4,
            ],
            Self::EvHousehold => [
                2.5, 2.5, 2.5, 2.5, 0.5, 0.3,
                0.8, 1.2, 0.8,
                0.2, 0.2, 0.2, 0.2, 0.2, 0.2,
                0.3, 0.8,
                1.8, 2.0, 2.0, 1.8,
                1.0, 1.0, 2.5,
            ],
        }
    }
}

/// Synthetic year of 5-minute intervals derived from the average monthly usage.
#[derive(Builder)]
pub struct LoadProfile {
    profile_type: ProfileType,
    average_monthly_usage: KilowattHours,

    /// Not used by the shape yet.
    #[builder(into, default)]
    postcode: String,

    /// Size of the solar panels, if the household has any.
    solar_system_size: Option<Kilowatts>,

    /// The sequence starts at the local midnight of this date.
    start_date: NaiveDate,
}

impl LoadProfile {
    #[instrument(
        skip_all,
        fields(
            profile_type = ?self.profile_type,
            postcode = %self.postcode,
            average_monthly_usage = %self.average_monthly_usage,
        ),
    )]
    pub fn generate(self) -> Vec<SimulatedInterval> {
        let weights = self.profile_type.hourly_weights();
        let weight_sum: f64 = weights.iter().sum();
        let solar_weight_sum: f64 = SOLAR_HOURLY_WEIGHTS.iter().sum();
        let average_daily_usage = self.average_monthly_usage / AVERAGE_DAYS_PER_MONTH;
        let step = TimeDelta::minutes(60 / i64::from(N_INTERVALS_PER_HOUR));

        let mut intervals = Vec::with_capacity(N_DAYS * 24 * usize::from(N_INTERVALS_PER_HOUR));
        for date in self.start_date.iter_days().take(N_DAYS) {
            let month = date.month0() as usize;
            let daily_usage = average_daily_usage * SEASONAL_MULTIPLIERS[month];
            let daily_generation = self.solar_system_size.map(|size| {
                KilowattHours::from(size.0 * SOLAR_DAILY_YIELD * SOLAR_SEASONAL_FACTORS[month])
            });

            let mut start = date.and_time(NaiveTime::MIN);
            for (weight, solar_weight) in weights.iter().zip(SOLAR_HOURLY_WEIGHTS) {
                let consumption = daily_usage * (weight / weight_sum);
                let generation = daily_generation
                    .map_or(KilowattHours::ZERO, |daily| daily * (solar_weight / solar_weight_sum));
                let net = consumption - generation;
                let (import, export) = if net >= KilowattHours::ZERO {
                    (net, KilowattHours::ZERO)
                } else {
                    (KilowattHours::ZERO, -net)
                };
                let n_intervals = f64::from(N_INTERVALS_PER_HOUR);
                for _ in 0..N_INTERVALS_PER_HOUR {
                    intervals.push(SimulatedInterval {
                        start,
                        kwh: import / n_intervals,
                        export_kwh: daily_generation.map(|_| export / n_intervals),
                    });
                    start += step;
                }
            }
        }

        let total: KilowattHours = intervals.iter().map(|interval| interval.kwh).sum();
        info!(n_intervals = intervals.len(), %total, "generated");
        intervals
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn generate(profile_type: ProfileType, solar_system_size: Option<f64>) -> Vec<SimulatedInterval> {
        LoadProfile::builder()
            .profile_type(profile_type)
            .average_monthly_usage(KilowattHours::from(450.0))
            .postcode("2000")
            .maybe_solar_system_size(solar_system_size.map(Kilowatts::from))
            .start_date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
            .build()
            .generate()
    }

    #[test]
    fn test_parse_profile_type() {
        use clap::ValueEnum;

        for (input, expected) in [
            ("home-evening", ProfileType::HomeEvening),
            ("HOME_EVENING", ProfileType::HomeEvening),
            ("HOME_ALL_DAY", ProfileType::HomeAllDay),
            ("SOLAR_HOUSEHOLD", ProfileType::SolarHousehold),
            ("ev-household", ProfileType::EvHousehold),
            ("EV_HOUSEHOLD", ProfileType::EvHousehold),
        ] {
            assert_eq!(ProfileType::from_str(input, false).unwrap(), expected, "{input}");
        }
    }

    #[test]
    fn test_interval_count() {
        for profile_type in [
            ProfileType::HomeEvening,
            ProfileType::HomeAllDay,
            ProfileType::SolarHousehold,
            ProfileType::EvHousehold,
        ] {
            assert_eq!(generate(profile_type, None).len(), 105_120);
        }
    }

    #[test]
    fn test_total_usage() {
        let intervals = generate(ProfileType::HomeEvening, None);
        let total: f64 = intervals.iter().map(|interval| interval.kwh.0).sum();
        assert!((5400.0 * 0.8..5400.0 * 1.2).contains(&total), "{total}");

        // Sum of the days in each month weighted by its multiplier, for 2026:
        assert_abs_diff_eq!(total, 450.0 / 30.4 * 365.3, epsilon = 1e-6);
    }

    #[test]
    fn test_timestamps() {
        let intervals = generate(ProfileType::HomeAllDay, None);
        assert_eq!(intervals[0].start.to_string(), "2026-01-01 00:00:00");
        assert_eq!(intervals[1].start.to_string(), "2026-01-01 00:05:00");
        assert_eq!(intervals[288].start.to_string(), "2026-01-02 00:00:00");
        assert_eq!(intervals.last().unwrap().start.to_string(), "2026-12-31 23:55:00");
        assert!(intervals.iter().all(|interval| interval.export_kwh.is_none()));
    }

    #[test]
    fn test_hour_split_evenly() {
        let intervals = generate(ProfileType::HomeEvening, None);
        // 18:00 on the first day, January multiplier, weight 2.0 out of 16.0:
        let expected = 450.0 / 30.4 * 1.13 * 2.0 / 16.0 / 12.0;
        for interval in &intervals[18 * 12..19 * 12] {
            assert_abs_diff_eq!(interval.kwh.0, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_solar_export() {
        let intervals = generate(ProfileType::HomeEvening, Some(6.6));
        let at = |hour: usize| &intervals[hour * 12];

        // Noon: generation exceeds consumption.
        assert_abs_diff_eq!(at(12).kwh.0, 0.0);
        assert!(at(12).export_kwh.unwrap().0 > 0.0);

        // Night: no generation at all.
        assert!(at(2).kwh.0 > 0.0);
        assert_abs_diff_eq!(at(2).export_kwh.unwrap().0, 0.0);

        let import: f64 = intervals.iter().map(|interval| interval.kwh.0).sum();
        assert!(import < 450.0 / 30.4 * 365.3);
    }
}
