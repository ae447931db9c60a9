//! Core analysis engine for chatpulse.
//!
//! This module contains:
//! - [`processor`] - The conversation walker
//! - [`text`] - Per-message feature extraction
//! - [`sentiment`] - Pluggable sentiment scorers
//! - [`temporal`] - Day/hour/week/month/year buckets
//! - [`accumulator`] - Mutable aggregate state and its merge
//! - [`reducer`] - Derived statistics computed after the walk
//! - [`calendar`] - Calendar-complete series, streaks and day analysis
//! - [`series`] - Timeline and cumulative series
//! - [`report`] - The output statistics document
//! - [`filter`] - Conversation filtering by date and title
//! - [`output`] - Format writers (JSON, CSV, HTML)
//!
//! # Quick Start
//!
//! ```rust
//! use chatpulse::core::{Analyzer, FilterConfig, apply_filters, to_json};
//! use chatpulse::config::AnalysisConfig;
//! use chatpulse::record::{ChatMessage, Conversation, Role};
//!
//! # fn main() -> chatpulse::Result<()> {
//! let conversations = vec![
//!     Conversation::new("Hello").with_message(ChatMessage::new(Role::User, "hi there")),
//! ];
//! let conversations = apply_filters(conversations, &FilterConfig::new());
//! let report = Analyzer::new(AnalysisConfig::new()).analyze(&conversations);
//! let json = to_json(&report)?;
//! assert!(json.contains("\"total_conversations\": 1"));
//! # Ok(())
//! # }
//! ```

pub mod accumulator;
pub mod calendar;
pub mod counter;
pub mod filter;
pub mod output;
pub mod processor;
pub mod reducer;
pub mod report;
pub mod sentiment;
pub mod series;
pub mod temporal;
pub mod text;

// Re-export main types for convenience
pub use accumulator::Accumulator;
pub use calendar::{Anniversary, CalendarCell, DaysAnalysis, Streak, StreakKind};
pub use counter::FrequencyCounter;
pub use filter::{FilterConfig, apply_filters};
pub use processor::{Analyzer, analyze};
pub use reducer::finalize;
pub use report::StatsReport;
pub use sentiment::{SentimentBackend, SentimentScorer, create_scorer};
pub use temporal::TimeBasis;
pub use text::{CodeDetection, SentimentClass, TextAnalyzer, TextFeatures};

#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
pub use output::{render_html, to_json, write_html, write_json};
