//! Temporal bucketing of conversation timestamps.
//!
//! Every derived field (date, hour, weekday, week, month, year) comes from a
//! single conversion of the epoch value through one [`TimeBasis`], so a
//! conversation never lands on a UTC date and a local hour at the same time.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, Timelike};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Latest calendar year treated as a real date.
pub const MAX_YEAR: i32 = 9999;

/// Timezone used to interpret epoch timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBasis {
    /// The host's local timezone
    #[default]
    Local,
    /// Coordinated Universal Time
    Utc,
    /// A fixed offset east of UTC, in seconds
    Fixed(i32),
}

impl TimeBasis {
    /// Converts epoch seconds to a wall-clock datetime in this basis.
    ///
    /// Returns `None` for timestamps chrono cannot represent and for
    /// wall-clock years outside `1..=MAX_YEAR`.
    pub fn to_datetime(&self, epoch_secs: f64) -> Option<NaiveDateTime> {
        if !epoch_secs.is_finite() {
            return None;
        }
        let secs = epoch_secs.floor();
        let nanos = ((epoch_secs - secs) * 1e9) as u32;
        let utc = DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))?;
        let dt = match self {
            TimeBasis::Local => utc.with_timezone(&Local).naive_local(),
            TimeBasis::Utc => utc.naive_utc(),
            TimeBasis::Fixed(offset) => {
                let tz = FixedOffset::east_opt(*offset)?;
                utc.with_timezone(&tz).naive_local()
            }
        };
        (1..=MAX_YEAR).contains(&dt.year()).then_some(dt)
    }
}

impl std::str::FromStr for TimeBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(TimeBasis::Local),
            "utc" => Ok(TimeBasis::Utc),
            other => other
                .parse::<i32>()
                .ok()
                .filter(|secs| FixedOffset::east_opt(*secs).is_some())
                .map(TimeBasis::Fixed)
                .ok_or_else(|| {
                    format!(
                        "Unknown time basis: '{}'. Expected local, utc or an offset in seconds",
                        s
                    )
                }),
        }
    }
}

/// Counters keyed by calendar period, plus a weekday x hour heat-map.
///
/// Weekdays are numbered from Monday (`0`) to Sunday (`6`). The `*_order`
/// sets keep day, hour and month keys in the order they were first counted,
/// which decides ties for the most active period.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemporalBuckets {
    pub daily: BTreeMap<NaiveDate, u64>,
    pub hourly: BTreeMap<u32, u64>,
    /// Keyed by `YYYY-MM`
    pub monthly: BTreeMap<String, u64>,
    /// Keyed by `YYYY-Www`, weeks starting on Sunday
    pub weekly: BTreeMap<String, u64>,
    pub weekday: BTreeMap<u32, u64>,
    pub yearly: BTreeMap<i32, u64>,
    pub heatmap: BTreeMap<u32, BTreeMap<u32, u64>>,
    pub day_order: IndexSet<NaiveDate>,
    pub hour_order: IndexSet<u32>,
    pub month_order: IndexSet<String>,
}

impl TemporalBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one conversation at `dt`.
    pub fn record(&mut self, dt: NaiveDateTime) {
        let date = dt.date();
        let hour = dt.hour();
        let weekday = dt.weekday().num_days_from_monday();

        let month = month_key(date);
        *self.daily.entry(date).or_default() += 1;
        *self.hourly.entry(hour).or_default() += 1;
        *self.monthly.entry(month.clone()).or_default() += 1;
        *self.weekly.entry(week_key(date)).or_default() += 1;
        *self.weekday.entry(weekday).or_default() += 1;
        *self.yearly.entry(date.year()).or_default() += 1;
        *self
            .heatmap
            .entry(weekday)
            .or_default()
            .entry(hour)
            .or_default() += 1;

        self.day_order.insert(date);
        self.hour_order.insert(hour);
        self.month_order.insert(month);
    }

    /// Number of conversations counted.
    pub fn total(&self) -> u64 {
        self.daily.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.daily.is_empty()
    }

    /// Adds every counter of `other` into `self`. Keys new to `self` are
    /// ordered after the ones it already holds.
    pub fn merge(&mut self, other: &TemporalBuckets) {
        merge_counts(&mut self.daily, &other.daily);
        merge_counts(&mut self.hourly, &other.hourly);
        merge_counts(&mut self.monthly, &other.monthly);
        merge_counts(&mut self.weekly, &other.weekly);
        merge_counts(&mut self.weekday, &other.weekday);
        merge_counts(&mut self.yearly, &other.yearly);
        for (day, hours) in &other.heatmap {
            merge_counts(self.heatmap.entry(*day).or_default(), hours);
        }
        self.day_order.extend(other.day_order.iter().copied());
        self.hour_order.extend(other.hour_order.iter().copied());
        self.month_order.extend(other.month_order.iter().cloned());
    }
}

fn merge_counts<K: Ord + Clone>(into: &mut BTreeMap<K, u64>, from: &BTreeMap<K, u64>) {
    for (key, count) in from {
        *into.entry(key.clone()).or_default() += count;
    }
}

/// `YYYY-MM` key for a date.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// `YYYY-Www` key with Sunday-first week numbering (`00` before the first
/// Sunday of the year).
pub fn week_key(date: NaiveDate) -> String {
    date.format("%Y-W%U").to_string()
}

/// English weekday name for a Monday-first index.
pub fn weekday_name(index: u32) -> &'static str {
    match index {
        0 => "Monday",
        1 => "Tuesday",
        2 => "Wednesday",
        3 => "Thursday",
        4 => "Friday",
        5 => "Saturday",
        6 => "Sunday",
        _ => "Unknown",
    }
}
