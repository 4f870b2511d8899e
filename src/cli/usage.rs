use std::path::PathBuf;

use chrono::{Local, NaiveDate, TimeDelta};
use clap::Parser;

use crate::{
    core::{
        interval::SimulatedInterval,
        profile::{LoadProfile, ProfileType},
    },
    input::{Usage, read_intervals},
    prelude::*,
    quantity::{energy::KilowattHours, power::Kilowatts},
};

/// Synthetic load profile settings.
#[derive(Parser)]
pub struct SyntheticArgs {
    /// Average monthly grid usage in kilowatt-hours.
    #[clap(long = "average-monthly-usage", env = "AVERAGE_MONTHLY_USAGE_KWH")]
    pub average_monthly_usage: Option<f64>,

    #[clap(long, env = "PROFILE_TYPE", default_value = "home-evening")]
    pub profile_type: ProfileType,

    #[clap(long, env = "POSTCODE", default_value = "")]
    pub postcode: String,

    /// Size of the solar panels in kilowatts.
    #[clap(long = "solar-system-size", env = "SOLAR_SYSTEM_SIZE_KW")]
    pub solar_system_size: Option<f64>,

    /// First day of the generated year, today by default.
    #[clap(long, env = "START_DATE")]
    pub start_date: Option<NaiveDate>,
}

impl SyntheticArgs {
    pub fn generate(&self) -> Result<Vec<SimulatedInterval>> {
        let average_monthly_usage = self
            .average_monthly_usage
            .context("either the interval file or the average monthly usage is required")?;
        ensure!(
            average_monthly_usage.is_finite() && average_monthly_usage >= 0.0,
            "the average monthly usage must be a non-negative number",
        );
        if let Some(size) = self.solar_system_size {
            ensure!(size.is_finite() && size >= 0.0, "the solar system size must be non-negative");
        }
        Ok(LoadProfile::builder()
            .profile_type(self.profile_type)
            .average_monthly_usage(KilowattHours::from(average_monthly_usage))
            .postcode(&self.postcode)
            .maybe_solar_system_size(self.solar_system_size.map(Kilowatts::from))
            .start_date(self.start_date.unwrap_or_else(|| Local::now().date_naive()))
            .build()
            .generate())
    }
}

/// Where the usage comes from: an interval file or a synthetic profile.
#[derive(Parser)]
pub struct UsageArgs {
    /// CSV or JSON file with the usage intervals or the raw daily meter reads.
    #[clap(long = "intervals", env = "INTERVALS_PATH")]
    pub intervals_path: Option<PathBuf>,

    #[clap(flatten)]
    pub synthetic: SyntheticArgs,

    /// Interval length in minutes, 5 unless the meter reads state otherwise.
    #[clap(
        long = "interval-duration",
        env = "INTERVAL_DURATION_MINUTES",
        value_parser = clap::value_parser!(u32).range(1..=1440),
    )]
    pub interval_duration_minutes: Option<u32>,
}

impl UsageArgs {
    pub fn load(&self) -> Result<Usage> {
        let mut usage = match &self.intervals_path {
            Some(path) => read_intervals(path)?,
            None => Usage { intervals: self.synthetic.generate()?, interval_duration: None },
        };
        if let Some(minutes) = self.interval_duration_minutes {
            usage.interval_duration = Some(TimeDelta::minutes(i64::from(minutes)));
        }
        Ok(usage)
    }
}
