//! Calendar-complete series and streak analysis.
//!
//! The daily activity map is sparse: a date is present only when at least
//! one conversation happened on it. This module expands it into dense
//! series using [`DateRange`], which owns all day-stepping so leap years and
//! month boundaries are handled in one place.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use chrono::NaiveDate;
//! use chatpulse::core::calendar::{github_style_data, analyze_days};
//!
//! let day = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
//! let daily = BTreeMap::from([(day, 4)]);
//!
//! let cells = github_style_data(&daily, None);
//! assert_eq!(cells.len(), 365);
//!
//! let days = analyze_days(&daily, day, day);
//! assert_eq!(days.total_days, 1);
//! assert_eq!(days.streaks.len(), 1);
//! ```

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Iterator over every date in an inclusive range.
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DateRange {
    /// Dates from `start` to `end`, both inclusive. Empty when `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            next: Some(start),
            end,
        }
    }

    /// Every date from January 1 of `first_year` to December 31 of
    /// `last_year`.
    pub fn full_years(first_year: i32, last_year: i32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(first_year, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(last_year, 12, 31)?;
        Some(Self::new(start, end))
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = current.succ_opt();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .filter(|d| *d <= self.end)
            .map_or(0, |d| (self.end - d).num_days() as usize + 1);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DateRange {}

/// Discrete usage intensity for a day: `0` for no activity, then `1` (1-2),
/// `2` (3-5), `3` (6-10) and `4` (more than 10).
pub fn activity_level(count: u64) -> u8 {
    match count {
        0 => 0,
        1..=2 => 1,
        3..=5 => 2,
        6..=10 => 3,
        _ => 4,
    }
}

/// A date highlighted in the calendar with a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anniversary {
    pub date: NaiveDate,
    pub label: String,
}

impl Anniversary {
    pub fn new(date: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            date,
            label: label.into(),
        }
    }
}

impl Default for Anniversary {
    /// The public launch of ChatGPT, 2022-11-30.
    fn default() -> Self {
        Self {
            date: NaiveDate::from_ymd_opt(2022, 11, 30).unwrap_or_default(),
            label: "launch".to_string(),
        }
    }
}

/// One day of the calendar heat-map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub count: u64,
    pub level: u8,
    /// Anniversary label, when this is the anniversary date
    pub special_level: Option<String>,
}

/// Expands `daily` to every day of every year it touches.
///
/// Returns an empty list when there is no activity.
pub fn github_style_data(
    daily: &BTreeMap<NaiveDate, u64>,
    anniversary: Option<&Anniversary>,
) -> Vec<CalendarCell> {
    let (Some(first), Some(last)) = (daily.keys().next(), daily.keys().next_back()) else {
        return Vec::new();
    };
    let Some(range) = DateRange::full_years(first.year(), last.year()) else {
        return Vec::new();
    };

    range
        .map(|date| {
            let count = daily.get(&date).copied().unwrap_or(0);
            CalendarCell {
                date,
                count,
                level: activity_level(count),
                special_level: anniversary
                    .filter(|a| a.date == date)
                    .map(|a| a.label.clone()),
            }
        })
        .collect()
}

/// Activity class of a streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakKind {
    Active,
    Inactive,
}

/// A maximal run of consecutive days with the same activity class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    #[serde(rename = "type")]
    pub kind: StreakKind,
    pub length: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Splits `[first, last]` into maximal active/inactive runs.
pub fn streaks(daily: &BTreeMap<NaiveDate, u64>, first: NaiveDate, last: NaiveDate) -> Vec<Streak> {
    let mut runs: Vec<Streak> = Vec::new();

    for date in DateRange::new(first, last) {
        let kind = if daily.get(&date).is_some_and(|c| *c > 0) {
            StreakKind::Active
        } else {
            StreakKind::Inactive
        };

        match runs.last_mut() {
            Some(run) if run.kind == kind => {
                run.length += 1;
                run.end_date = date;
            }
            _ => runs.push(Streak {
                kind,
                length: 1,
                start_date: date,
                end_date: date,
            }),
        }
    }

    runs
}

/// Active vs. inactive days over the tight date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaysAnalysis {
    pub total_days: u64,
    pub active_days: u64,
    pub inactive_days: u64,
    pub active_percentage: f64,
    pub inactive_percentage: f64,
    pub longest_active_streak: u64,
    pub longest_inactive_streak: u64,
    pub average_active_streak: f64,
    pub average_inactive_streak: f64,
    pub streaks: Vec<Streak>,
}

/// Analyzes every calendar day from `first` to `last` inclusive.
///
/// Percentages and average streak lengths are rounded to two decimals.
pub fn analyze_days(
    daily: &BTreeMap<NaiveDate, u64>,
    first: NaiveDate,
    last: NaiveDate,
) -> DaysAnalysis {
    let total_days = if last < first {
        0
    } else {
        (last - first).num_days() as u64 + 1
    };
    let active_days = if total_days == 0 {
        0
    } else {
        daily
            .range(first..=last)
            .filter(|(_, count)| **count > 0)
            .count() as u64
    };
    let inactive_days = total_days - active_days;

    let percentage = |days: u64| {
        if total_days == 0 {
            0.0
        } else {
            round2(days as f64 / total_days as f64 * 100.0)
        }
    };

    let runs = streaks(daily, first, last);
    let (longest_active_streak, average_active_streak) = run_stats(&runs, StreakKind::Active);
    let (longest_inactive_streak, average_inactive_streak) = run_stats(&runs, StreakKind::Inactive);

    DaysAnalysis {
        total_days,
        active_days,
        inactive_days,
        active_percentage: percentage(active_days),
        inactive_percentage: percentage(inactive_days),
        longest_active_streak,
        longest_inactive_streak,
        average_active_streak,
        average_inactive_streak,
        streaks: runs,
    }
}

fn run_stats(runs: &[Streak], kind: StreakKind) -> (u64, f64) {
    let lengths: Vec<u64> = runs
        .iter()
        .filter(|r| r.kind == kind)
        .map(|r| r.length)
        .collect();
    let longest = lengths.iter().copied().max().unwrap_or(0);
    let average = if lengths.is_empty() {
        0.0
    } else {
        round2(lengths.iter().sum::<u64>() as f64 / lengths.len() as f64)
    };
    (longest, average)
}

/// Rounds to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
