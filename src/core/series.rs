//! Per-day series over active dates: timeline and cumulative growth.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One active day on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub count: u64,
    /// English weekday name, e.g. `Monday`
    pub day_of_week: String,
    /// English month name, e.g. `November`
    pub month: String,
    pub year: i32,
    /// ISO 8601 week number
    pub week_of_year: u32,
}

/// Running totals as of one active day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub date: NaiveDate,
    pub daily_conversations: u64,
    pub cumulative_conversations: u64,
    pub daily_messages: u64,
    pub cumulative_messages: u64,
    pub daily_words: u64,
    pub cumulative_words: u64,
}

/// Builds the timeline, ascending by date.
pub fn timeline_data(daily: &BTreeMap<NaiveDate, u64>) -> Vec<TimelinePoint> {
    daily
        .iter()
        .map(|(date, count)| TimelinePoint {
            date: *date,
            count: *count,
            day_of_week: date.format("%A").to_string(),
            month: date.format("%B").to_string(),
            year: date.year(),
            week_of_year: date.iso_week().week(),
        })
        .collect()
}

/// Builds running totals of conversations, messages and words per active
/// day.
///
/// Messages and words are attributed to their conversation's date; days
/// present only in `messages` or `words` are ignored.
pub fn cumulative_data(
    conversations: &BTreeMap<NaiveDate, u64>,
    messages: &BTreeMap<NaiveDate, u64>,
    words: &BTreeMap<NaiveDate, u64>,
) -> Vec<CumulativePoint> {
    let mut running = CumulativePoint::default();

    conversations
        .iter()
        .map(|(date, count)| {
            let daily_messages = messages.get(date).copied().unwrap_or(0);
            let daily_words = words.get(date).copied().unwrap_or(0);
            running.cumulative_conversations += count;
            running.cumulative_messages += daily_messages;
            running.cumulative_words += daily_words;

            CumulativePoint {
                date: *date,
                daily_conversations: *count,
                daily_messages,
                daily_words,
                ..running.clone()
            }
        })
        .collect()
}
