use crate::core::calendar::MonthDay;

/// Something that applies during a recurring range of calendar dates.
pub trait Seasonal {
    fn start_date(&self) -> MonthDay;

    /// Inclusive.
    fn end_date(&self) -> MonthDay;

    /// Check whether the date falls within the season, which may cross the new year.
    fn covers(&self, date: MonthDay) -> bool {
        let (start, end) = (self.start_date(), self.end_date());
        if start <= end { (start..=end).contains(&date) } else { date >= start || date <= end }
    }
}

/// Find the first season covering the date.
pub fn find_period<P: Seasonal>(periods: &[P], date: MonthDay) -> Option<&P> {
    periods.iter().find(|period| period.covers(date))
}
