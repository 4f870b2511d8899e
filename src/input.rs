use std::{fmt::Debug, fs, io::Write, path::Path};

use chrono::TimeDelta;
use serde::Deserialize;

use crate::{
    core::{
        interval::{IntervalRead, SimulatedInterval},
        plan::Plan,
    },
    prelude::*,
};

/// Plan file contents: a bare list, a `plans` table, or a single plan.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlanDocument {
    Many(Vec<Plan>),
    Wrapped { plans: Vec<Plan> },
    One(Box<Plan>),
}

impl From<PlanDocument> for Vec<Plan> {
    fn from(document: PlanDocument) -> Self {
        match document {
            PlanDocument::Many(plans) | PlanDocument::Wrapped { plans } => plans,
            PlanDocument::One(plan) => vec![*plan],
        }
    }
}

/// Read plans from a JSON or TOML file, depending on the extension.
#[instrument(name = "reading plans…")]
pub fn read_plans<P: AsRef<Path> + Debug>(path: P) -> Result<Vec<Plan>> {
    let path = path.as_ref();
    let contents = fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?;
    let document: PlanDocument = if has_extension(path, "toml") {
        toml::from_slice(&contents)?
    } else {
        serde_json::from_slice(&contents)?
    };
    let plans = Vec::from(document);
    ensure!(!plans.is_empty(), "`{}` contains no plans", path.display());
    info!(n_plans = plans.len(), "loaded");
    Ok(plans)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntervalDocument {
    Intervals(Vec<SimulatedInterval>),
    Reads(Vec<IntervalRead>),
    Read(IntervalRead),
}

/// Usage intervals loaded from a file.
pub struct Usage {
    pub intervals: Vec<SimulatedInterval>,

    /// Interval length stated by the meter reads, if the file carries one.
    pub interval_duration: Option<TimeDelta>,
}

/// Read usage intervals from a CSV file (`start,kwh[,export_kwh]`), or from JSON with either
/// the intervals or the raw daily meter reads.
#[instrument(name = "reading intervals…")]
pub fn read_intervals<P: AsRef<Path> + Debug>(path: P) -> Result<Usage> {
    let path = path.as_ref();
    if has_extension(path, "csv") {
        let intervals = csv::Reader::from_path(path)?
            .deserialize()
            .collect::<Result<Vec<SimulatedInterval>, _>>()
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        info!(n_intervals = intervals.len(), "loaded");
        return Ok(Usage { intervals, interval_duration: None });
    }

    let contents = fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?;
    let usage = match serde_json::from_slice(&contents)? {
        IntervalDocument::Intervals(intervals) => Usage { intervals, interval_duration: None },
        IntervalDocument::Read(read) => Usage::try_from(vec![read])?,
        IntervalDocument::Reads(reads) => Usage::try_from(reads)?,
    };
    info!(n_intervals = usage.intervals.len(), "loaded");
    Ok(usage)
}

impl TryFrom<Vec<IntervalRead>> for Usage {
    type Error = Error;

    fn try_from(mut reads: Vec<IntervalRead>) -> Result<Self> {
        reads.sort_by_key(|read| read.date);
        let interval_duration = reads.first().map(IntervalRead::interval_duration);
        ensure!(
            reads.iter().all(|read| Some(read.interval_duration()) == interval_duration),
            "meter reads of different interval lengths cannot be mixed",
        );
        let mut intervals = Vec::new();
        for read in &reads {
            intervals.extend(read.to_intervals()?);
        }
        Ok(Self { intervals, interval_duration })
    }
}

/// Write the intervals as CSV with a header.
pub fn write_intervals(intervals: &[SimulatedInterval], writer: impl Write) -> Result {
    let mut writer = csv::Writer::from_writer(writer);
    for interval in intervals {
        writer.serialize(interval)?;
    }
    writer.flush()?;
    Ok(())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|actual| actual.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::profile::{LoadProfile, ProfileType};

    fn temporary_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("tariff-simulator-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    const PLAN_JSON: &str = r#"{
        "planId": "FLAT",
        "brandName": "Flat Energy",
        "displayName": "Flat",
        "tariffPeriods": [{
            "startDate": "01-01",
            "endDate": "12-31",
            "dailySupplyCharge": 1.0,
            "rates": [{"unitPrice": 0.3, "timeWindows": [{"days": ["MON"], "startTime": "00:00", "endTime": "00:00"}]}]
        }]
    }"#;

    #[test]
    fn test_read_plan_documents() {
        for (name, contents) in [
            ("one.json", PLAN_JSON.to_owned()),
            ("many.json", format!("[{PLAN_JSON}, {PLAN_JSON}]")),
            ("wrapped.json", format!(r#"{{"plans": [{PLAN_JSON}]}}"#)),
        ] {
            let path = temporary_file(name, &contents);
            let plans = read_plans(&path).unwrap();
            assert!(!plans.is_empty(), "{name}");
            assert_eq!(plans[0].id, "FLAT");
            fs::remove_file(path).unwrap();
        }
    }

    #[test]
    fn test_read_toml_plans() {
        let path = temporary_file(
            "plans.toml",
            r#"
                [[plans]]
                planId = "TOML"
                brandName = "Toml Energy"

                [[plans.tariffPeriods]]
                startDate = "01-01"
                endDate = "12-31"
                dailySupplyCharge = 1.1

                [[plans.tariffPeriods.rates]]
                type = "PEAK"
                unitPrice = 0.25
                volumeLimit = 10

                [[plans.tariffPeriods.rates.timeWindows]]
                days = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"]
                startTime = "00:00"
                endTime = "24:00"
            "#,
        );
        let plans = read_plans(&path).unwrap();
        fs::remove_file(path).unwrap();
        assert_eq!(plans.len(), 1);
        assert_abs_diff_eq!(plans[0].tariff_periods[0].rates[0].volume_limit.unwrap().0, 10.0);
    }

    #[test]
    fn test_csv_round_trip() {
        let intervals = LoadProfile::builder()
            .profile_type(ProfileType::HomeEvening)
            .average_monthly_usage(450.0.into())
            .solar_system_size(5.0.into())
            .start_date(chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
            .build()
            .generate();
        let mut buffer = Vec::new();
        write_intervals(&intervals[..288], &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("start,kwh,export_kwh\n2026-01-01T00:00:00,"));

        let path = temporary_file("intervals.csv", &text);
        let usage = read_intervals(&path).unwrap();
        fs::remove_file(path).unwrap();
        assert_eq!(usage.intervals.len(), 288);
        assert!(usage.interval_duration.is_none());
        assert_eq!(usage.intervals[287].start, intervals[287].start);
    }

    #[test]
    fn test_read_csv_without_export() {
        let path = temporary_file(
            "import-only.csv",
            "start,kwh\n2026-01-01T00:00:00Z,0.5\n2026-01-01T00:05:00Z,0.25\n",
        );
        let usage = read_intervals(&path).unwrap();
        fs::remove_file(path).unwrap();
        assert_eq!(usage.intervals.len(), 2);
        assert!(usage.intervals[1].export_kwh.is_none());
        assert_abs_diff_eq!(usage.intervals[1].kwh.0, 0.25);
    }

    #[test]
    fn test_read_meter_reads() {
        let path = temporary_file(
            "reads.json",
            r#"[
                {"date": "2026-01-02", "interval_read": {"aggregate_value": 0.3, "read_interval_length": 30, "interval_reads": [0.1, 0.2]}},
                {"date": "2026-01-01", "interval_read": {"aggregate_value": 0.3, "read_interval_length": 30, "interval_reads": [0.3]}}
            ]"#,
        );
        let usage = read_intervals(&path).unwrap();
        fs::remove_file(path).unwrap();
        assert_eq!(usage.interval_duration, Some(TimeDelta::minutes(30)));
        assert_eq!(usage.intervals.len(), 3);
        assert_eq!(usage.intervals[0].start.to_string(), "2026-01-01 00:00:00");
        assert_eq!(usage.intervals[2].start.to_string(), "2026-01-02 00:30:00");
    }

    #[test]
    fn test_mixed_read_lengths() {
        let path = temporary_file(
            "mixed.json",
            r#"[
                {"date": "2026-01-01", "interval_read": {"aggregate_value": 0.1, "read_interval_length": 30, "interval_reads": [0.1]}},
                {"date": "2026-01-02", "interval_read": {"aggregate_value": 0.1, "read_interval_length": 15, "interval_reads": [0.1]}}
            ]"#,
        );
        let result = read_intervals(&path);
        fs::remove_file(path).unwrap();
        assert!(result.is_err());
    }
}
