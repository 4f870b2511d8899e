use serde::{Deserialize, Serialize};

use crate::core::{
    calendar::{Day, DaySet, TimeOfDay},
    time::Moment,
};

/// Weekdays and a time-of-day range during which a rate or a demand charge is active.
#[derive(Clone, Debug, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    #[builder(into, default = DaySet::all())]
    pub days: DaySet,

    /// Inclusive.
    #[builder(default = TimeOfDay::MIDNIGHT)]
    pub start_time: TimeOfDay,

    /// Exclusive. Wraps past midnight when earlier than the start.
    #[builder(default = TimeOfDay::MIDNIGHT)]
    pub end_time: TimeOfDay,
}

impl TimeWindow {
    pub fn contains(&self, day: Day, minute_of_day: u16) -> bool {
        self.days.contains(day) && covers(self.start_time, self.end_time, minute_of_day)
    }

    pub fn contains_moment(&self, moment: &Moment) -> bool {
        self.contains(moment.day, moment.minute_of_day)
    }
}

/// Whether the `[start, end)` time-of-day range covers the minute, wrapping past midnight if needed.
pub fn covers(start: TimeOfDay, end: TimeOfDay, minute_of_day: u16) -> bool {
    let start = start.minutes();
    let end = end.as_end();
    if start < end {
        (start..end).contains(&minute_of_day)
    } else {
        minute_of_day >= start || minute_of_day < end
    }
}
