//! Filter conversations by date range and title.
//!
//! This module provides [`FilterConfig`] for defining filter criteria and
//! [`apply_filters`] for restricting a record set before analysis.
//!
//! # Filter Types
//!
//! | Filter | Method | Description |
//! |--------|--------|-------------|
//! | Date from | [`with_date_from`](FilterConfig::with_date_from) | Conversations on or after date |
//! | Date to | [`with_date_to`](FilterConfig::with_date_to) | Conversations on or before date |
//! | Title | [`with_title`](FilterConfig::with_title) | Title contains text |
//!
//! # Example
//!
//! ```
//! use chatpulse::core::filter::{FilterConfig, apply_filters};
//! use chatpulse::core::temporal::TimeBasis;
//! use chatpulse::record::Conversation;
//!
//! # fn main() -> chatpulse::Result<()> {
//! let conversations = vec![
//!     Conversation::new("Rust traits").with_create_time(1_672_574_400.0), // 2023-01-01
//!     Conversation::new("Rust macros").with_create_time(1_718_452_800.0), // 2024-06-15
//!     Conversation::new("Cooking"),
//! ];
//!
//! let config = FilterConfig::new()
//!     .with_time_basis(TimeBasis::Utc)
//!     .with_date_from("2024-01-01")?
//!     .with_title("rust");
//!
//! let filtered = apply_filters(conversations, &config);
//! assert_eq!(filtered.len(), 1);
//! assert_eq!(filtered[0].title(), "Rust macros");
//! # Ok(())
//! # }
//! ```
//!
//! # Behavior Notes
//!
//! - Conversations without a timestamp are **excluded** when date filters are active
//! - Title matching is a case-insensitive substring match
//! - Multiple filters are combined with AND logic

use chrono::NaiveDate;

use super::temporal::TimeBasis;
use crate::error::ChatpulseError;
use crate::record::Conversation;

/// Configuration for filtering conversations by date and title.
///
/// Filters are combined with AND logic: a conversation must match all
/// active filters to be included in the result.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Include only conversations on or after this date.
    pub after: Option<NaiveDate>,

    /// Include only conversations on or before this date.
    pub before: Option<NaiveDate>,

    /// Include only conversations whose title contains this text.
    pub title: Option<String>,

    /// Timezone used to date conversations.
    pub time_basis: TimeBasis,
}

impl FilterConfig {
    /// Creates a new empty filter configuration.
    ///
    /// No filters are active by default; all conversations pass through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::InvalidDate`] if the format is invalid.
    pub fn with_date_from(mut self, date_str: &str) -> Result<Self, ChatpulseError> {
        self.after = Some(parse_date(date_str)?);
        Ok(self)
    }

    /// Sets the end date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::InvalidDate`] if the format is invalid.
    pub fn with_date_to(mut self, date_str: &str) -> Result<Self, ChatpulseError> {
        self.before = Some(parse_date(date_str)?);
        Ok(self)
    }

    /// Sets the title filter.
    #[must_use]
    pub fn with_title(mut self, text: impl Into<String>) -> Self {
        self.title = Some(text.into());
        self
    }

    /// Sets the timezone used to date conversations.
    #[must_use]
    pub fn with_time_basis(mut self, basis: TimeBasis) -> Self {
        self.time_basis = basis;
        self
    }

    /// Returns `true` if any filter is active.
    pub fn is_active(&self) -> bool {
        self.has_date_filter() || self.title.is_some()
    }

    /// Returns `true` if date filters are active.
    pub fn has_date_filter(&self) -> bool {
        self.after.is_some() || self.before.is_some()
    }

    /// Returns `true` if `conversation` passes every active filter.
    pub fn matches(&self, conversation: &Conversation) -> bool {
        if let Some(ref needle) = self.title {
            if !conversation
                .title()
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }

        if self.has_date_filter() {
            let date = conversation
                .create_time
                .and_then(|secs| self.time_basis.to_datetime(secs))
                .map(|dt| dt.date());
            match date {
                Some(date) => {
                    if self.after.is_some_and(|after| date < after) {
                        return false;
                    }
                    if self.before.is_some_and(|before| date > before) {
                        return false;
                    }
                }
                None => return false,
            }
        }

        true
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate, ChatpulseError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| ChatpulseError::invalid_date(date_str))
}

/// Filters a record set based on the provided configuration.
///
/// If no filters are active, returns the original conversations unchanged.
pub fn apply_filters(conversations: Vec<Conversation>, config: &FilterConfig) -> Vec<Conversation> {
    if !config.is_active() {
        return conversations;
    }

    let before = conversations.len();
    let filtered: Vec<Conversation> = conversations
        .into_iter()
        .filter(|conv| config.matches(conv))
        .collect();
    tracing::debug!(before, after = filtered.len(), "applied conversation filters");
    filtered
}
