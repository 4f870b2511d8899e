use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use chrono::{Datelike, Months, NaiveDate, Weekday};
use enumset::EnumSet;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::core::error::SimulationError;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(Debug, Hash, PartialOrd, Ord, Serialize, Deserialize, enumset::EnumSetType)]
#[serde(rename_all = "UPPERCASE")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Mon,
            Weekday::Tue => Self::Tue,
            Weekday::Wed => Self::Wed,
            Weekday::Thu => Self::Thu,
            Weekday::Fri => Self::Fri,
            Weekday::Sat => Self::Sat,
            Weekday::Sun => Self::Sun,
        }
    }
}

/// Set of weekday codes, serialized as a list like `["MON", "TUE"]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, derive_more::Deref)]
#[serde(from = "Vec<Day>", into = "Vec<Day>")]
pub struct DaySet(pub EnumSet<Day>);

impl DaySet {
    #[must_use]
    pub fn all() -> Self {
        Self(EnumSet::all())
    }
}

impl From<Vec<Day>> for DaySet {
    fn from(days: Vec<Day>) -> Self {
        Self(days.into_iter().collect())
    }
}

impl From<DaySet> for Vec<Day> {
    fn from(days: DaySet) -> Self {
        days.0.iter().collect()
    }
}

impl<const N: usize> From<[Day; N]> for DaySet {
    fn from(days: [Day; N]) -> Self {
        Self(days.into_iter().collect())
    }
}

/// Recurring calendar date without a year, written as zero-padded `MM-DD`.
///
/// Ordering follows the position within a calendar year.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    pub fn new(month: u32, day: u32) -> Option<Self> {
        // Leap year so that `02-29` is accepted:
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { month, day })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self { month: date.month(), day: date.day() }
    }
}

impl FromStr for MonthDay {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SimulationError::InvalidMonthDay(s.to_owned());
        let (month, day) = split_fixed_width(s, '-').ok_or_else(invalid)?;
        Self::new(month, day).ok_or_else(invalid)
    }
}

impl Display for MonthDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Wall-clock time of day with minute resolution, written as `HH:MM` in `00:00..=24:00`.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self(0);

    pub const fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes <= MINUTES_PER_DAY { Some(Self(minutes)) } else { None }
    }

    pub const fn minutes(self) -> u16 {
        self.0
    }

    /// Minute offset when used as an exclusive window end: midnight closes the day.
    pub const fn as_end(self) -> u16 {
        if self.0 == 0 { MINUTES_PER_DAY } else { self.0 }
    }
}

impl FromStr for TimeOfDay {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SimulationError::InvalidTimeOfDay(s.to_owned());
        let (hours, minutes) = split_fixed_width(s, ':').ok_or_else(invalid)?;
        if hours > 24 || minutes > 59 {
            return Err(invalid());
        }
        let minutes = u16::try_from(hours * 60 + minutes).map_err(|_| invalid())?;
        Self::from_minutes(minutes).ok_or_else(invalid)
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Billing month, written as `YYYY-MM`.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct YearMonth {
    first_day: NaiveDate,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self { first_day: date.with_day(1).unwrap_or(date) }
    }

    pub fn days_in_month(self) -> u32 {
        self.first_day
            .checked_add_months(Months::new(1))
            .and_then(|next| u32::try_from((next - self.first_day).num_days()).ok())
            .unwrap_or(31)
    }
}

impl FromStr for YearMonth {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
            .map(|first_day| Self { first_day })
            .map_err(|_| SimulationError::InvalidMonth(s.to_owned()))
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.first_day.format("%Y-%m"))
    }
}

/// Split `NN<separator>NN` into its two numbers, requiring exactly two digits on either side.
fn split_fixed_width(s: &str, separator: char) -> Option<(u32, u32)> {
    let (lhs, rhs) = s.split_once(separator)?;
    let parse = |part: &str| {
        if part.len() == 2 && part.bytes().all(|byte| byte.is_ascii_digit()) {
            part.parse().ok()
        } else {
            None
        }
    };
    Some((parse(lhs)?, parse(rhs)?))
}
