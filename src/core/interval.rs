use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    core::{calendar::MINUTES_PER_DAY, error::SimulationError, time::parse_timestamp},
    prelude::*,
    quantity::energy::KilowattHours,
};

/// Energy flow over one fixed-duration interval.
#[derive(Clone, Debug, Serialize, Deserialize, bon::Builder)]
pub struct SimulatedInterval {
    /// Local wall-clock start.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start: NaiveDateTime,

    /// Grid import.
    #[builder(into)]
    pub kwh: KilowattHours,

    /// Solar export, not credited.
    #[serde(default, alias = "exportKwh")]
    #[builder(into)]
    pub export_kwh: Option<KilowattHours>,
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<NaiveDateTime, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s).map_err(serde::de::Error::custom)
}

/// One day of raw meter reads, as exported by the meter data provider.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntervalRead {
    pub date: NaiveDate,
    pub interval_read: DailyReads,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DailyReads {
    /// Daily total as reported by the meter.
    pub aggregate_value: KilowattHours,

    /// Minutes.
    pub read_interval_length: u32,

    pub interval_reads: Vec<KilowattHours>,
}

impl IntervalRead {
    pub fn interval_duration(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.interval_read.read_interval_length))
    }

    /// Lay the reads end to end starting at the local midnight.
    pub fn to_intervals(&self) -> Result<Vec<SimulatedInterval>, SimulationError> {
        let reads = &self.interval_read;
        let invalid = |reason: String| SimulationError::InvalidIntervalRead { date: self.date, reason };

        if reads.read_interval_length == 0 {
            return Err(invalid("read interval length is zero".to_owned()));
        }
        let total_minutes = u64::from(reads.read_interval_length) * reads.interval_reads.len() as u64;
        if total_minutes > u64::from(MINUTES_PER_DAY) {
            return Err(invalid(format!(
                "{} reads of {} minutes do not fit into one day",
                reads.interval_reads.len(),
                reads.read_interval_length,
            )));
        }

        let total: KilowattHours = reads.interval_reads.iter().copied().sum();
        if (total - reads.aggregate_value).abs().0 > 1e-3 {
            warn!(
                date = %self.date,
                %total,
                aggregate = %reads.aggregate_value,
                "interval reads do not add up to the aggregate",
            );
        }

        let midnight = self.date.and_time(NaiveTime::MIN);
        let step = self.interval_duration();
        Ok((0..)
            .zip(&reads.interval_reads)
            .map(|(index, kwh)| SimulatedInterval {
                start: midnight + step * index,
                kwh: *kwh,
                export_kwh: None,
            })
            .collect())
    }
}
