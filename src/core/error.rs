use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    core::calendar::{Day, MonthDay, TimeOfDay},
    quantity::energy::KilowattHours,
};

/// Unrecoverable failure of a single plan simulation.
///
/// None of these are retried or substituted with a default: guessing a rate would corrupt the estimate.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid timestamp `{0}`")]
    InvalidTimestamp(String),

    #[error("invalid month-day `{0}`, expected `MM-DD`")]
    InvalidMonthDay(String),

    #[error("invalid time of day `{0}`, expected `HH:MM`")]
    InvalidTimeOfDay(String),

    #[error("invalid month `{0}`, expected `YYYY-MM`")]
    InvalidMonth(String),

    #[error("no tariff period covers {0}")]
    NoTariffPeriodMatch(MonthDay),

    #[error("no rate is defined for {day:?} at {time} on {date}")]
    NoRateMatch { date: MonthDay, day: Day, time: TimeOfDay },

    #[error(
        "daily usage of {daily_usage} exceeds every volume limit for {day:?} on {date} and there is no unlimited rate"
    )]
    VolumeLimitExceeded { date: MonthDay, day: Day, daily_usage: KilowattHours },

    #[error("interval at {start} does not follow the previous interval at {previous}")]
    UnorderedInterval { previous: String, start: String },

    #[error("invalid interval read on {date}: {reason}")]
    InvalidIntervalRead { date: NaiveDate, reason: String },
}
