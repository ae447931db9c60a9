//! The output statistics document.
//!
//! [`StatsReport`] is the single artifact an analysis run produces. Its
//! field names are the keys of the JSON document consumed by the report
//! template, so renaming a field is a breaking change for templates.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::calendar::{CalendarCell, DaysAnalysis};
use super::series::{CumulativePoint, TimelinePoint};
use super::text::SentimentClass;

/// Per-conversation quality record, kept for conversations with at least
/// one analyzed message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityRecord {
    pub title: String,
    /// Mean polarity of the conversation's messages
    pub sentiment: f64,
    pub message_count: u64,
    pub word_count: u64,
    /// Mean message length in characters
    pub avg_message_length: f64,
    pub sentiment_category: SentimentClass,
}

/// A month whose activity exceeds the peak threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakPeriod {
    /// `YYYY-MM`
    pub month: String,
    pub count: u64,
    /// `count` divided by the mean monthly count
    pub intensity: f64,
}

/// Pearson correlations over the complexity records. Both are `0.0` when
/// undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationData {
    /// Mean message length vs. mean sentiment
    pub message_length_sentiment: f64,
    /// Message count vs. word count
    pub messages_words: f64,
}

/// Complete statistics for one export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsReport {
    // Totals
    pub total_conversations: u64,
    pub total_messages: u64,
    pub total_words: u64,
    pub total_characters: u64,
    /// Analyzed messages per author role
    pub message_types: IndexMap<String, u64>,

    // Temporal distributions
    pub daily_activity: BTreeMap<NaiveDate, u64>,
    pub hourly_activity: BTreeMap<u32, u64>,
    pub monthly_activity: BTreeMap<String, u64>,
    pub weekly_activity: BTreeMap<String, u64>,
    /// Weekday name to count, Monday first
    pub weekday_activity: IndexMap<String, u64>,
    pub yearly_activity: BTreeMap<i32, u64>,
    /// Weekday (0 = Monday) to hour to count
    pub heatmap_data: BTreeMap<u32, BTreeMap<u32, u64>>,

    // Frequency tables, truncated and ordered by descending count
    pub word_frequency: IndexMap<String, u64>,
    pub topics: IndexMap<String, u64>,
    pub technical_terms: IndexMap<String, u64>,
    pub programming_languages: IndexMap<String, u64>,
    pub emojis_used: IndexMap<String, u64>,
    pub languages: IndexMap<String, u64>,
    pub interaction_patterns: IndexMap<String, u64>,
    pub question_patterns: IndexMap<String, u64>,

    // Sentiment
    pub positive_messages: u64,
    pub negative_messages: u64,
    pub neutral_messages: u64,
    pub sentiment_scores: Vec<f64>,
    pub avg_sentiment: f64,
    pub sentiment_std: f64,

    // Content markers
    pub code_blocks: u64,
    pub urls_shared: u64,

    // Conversation rollups
    pub conversation_lengths: Vec<u64>,
    pub conversation_titles: Vec<String>,
    pub conversation_complexity: Vec<ComplexityRecord>,
    pub longest_conversation: u64,
    pub shortest_conversation: u64,
    pub avg_conversation_length: f64,
    pub longest_message: u64,
    pub shortest_message: u64,
    pub avg_message_length: f64,
    pub avg_words_per_message: f64,

    // Derived scalars
    /// Date of the earliest conversation, `YYYY-MM-DD`
    pub first_conversation: Option<NaiveDate>,
    /// Date of the latest conversation, `YYYY-MM-DD`
    pub last_conversation: Option<NaiveDate>,
    pub most_active_day: Option<NaiveDate>,
    pub most_active_hour: Option<u32>,
    pub most_active_month: Option<String>,
    pub conversations_per_day: f64,
    pub messages_per_day: f64,
    pub words_per_day: f64,
    pub peak_usage_periods: Vec<PeakPeriod>,
    /// `(YYYY-MM, count)` ascending by month
    pub usage_trends: Vec<(String, u64)>,
    /// Hours between consecutive dated conversations, in record order
    pub conversation_gaps: Vec<f64>,
    pub correlation_data: CorrelationData,

    // Visualization series
    pub github_style_data: Vec<CalendarCell>,
    pub timeline_data: Vec<TimelinePoint>,
    pub cumulative_data: Vec<CumulativePoint>,
    pub days_analysis: Option<DaysAnalysis>,

    /// Profile document from the export, passed through untouched
    pub user_profile: Option<Value>,
}

impl StatsReport {
    /// Attaches the export's profile document.
    #[must_use]
    pub fn with_user_profile(mut self, profile: Option<Value>) -> Self {
        self.user_profile = profile;
        self
    }

    /// Share of active days in the tight range, `0.0` without dated data.
    pub fn active_percentage(&self) -> f64 {
        self.days_analysis
            .as_ref()
            .map_or(0.0, |days| days.active_percentage)
    }
}
