use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::core::{
    calendar::{Day, MonthDay, TimeOfDay},
    error::SimulationError,
};

/// Calendar coordinates of an interval start, as seen on the local wall clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Moment {
    pub timestamp: NaiveDateTime,
    pub day: Day,

    /// Minutes since midnight, `0..1440`.
    pub minute_of_day: u16,
}

impl From<NaiveDateTime> for Moment {
    fn from(timestamp: NaiveDateTime) -> Self {
        #[expect(clippy::cast_possible_truncation)]
        let minute_of_day = (timestamp.hour() * 60 + timestamp.minute()) as u16;
        Self { timestamp, day: timestamp.weekday().into(), minute_of_day }
    }
}

impl Moment {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn month_day(&self) -> MonthDay {
        MonthDay::of(self.date())
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_minutes(self.minute_of_day).unwrap_or(TimeOfDay::MIDNIGHT)
    }
}

const NAIVE_FORMATS: [&str; 4] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Parse an ISO-like local timestamp.
///
/// A UTC designator or an offset is accepted but not applied: the written wall-clock fields are used as is.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, SimulationError> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(s) {
        return Ok(timestamp.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .ok_or_else(|| SimulationError::InvalidTimestamp(s.to_owned()))
}
