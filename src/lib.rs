//! # Chatpulse
//!
//! A Rust library for descriptive analytics over ChatGPT data exports.
//!
//! ## Overview
//!
//! Chatpulse reads the `conversations.json` record set from an export and
//! produces a single statistics document:
//! - **Activity** — daily, hourly, weekly, monthly and yearly counts, a
//!   weekday × hour heat-map, and a calendar-complete series for every year
//!   with activity
//! - **Streaks** — active/inactive day runs and percentages
//! - **Text** — word, topic, technical-term, programming-language and emoji
//!   frequencies, interaction patterns and language guesses
//! - **Sentiment** — per-message polarity and class, per-conversation
//!   averages and correlations
//!
//! The document can be written as JSON, as a CSV calendar, or embedded into
//! an HTML report template.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatpulse::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // Load an extracted export directory
//!     let export = ExportParser::new().parse("chatgpt-export/")?;
//!
//!     // Analyze it
//!     let report = Analyzer::new(AnalysisConfig::new())
//!         .analyze(&export.conversations)
//!         .with_user_profile(export.user_profile);
//!
//!     // Write to JSON
//!     write_json(&report, "stats.json")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] — [`ExportParser`](parser::ExportParser): locating, size-checking and reading exports
//! - [`record`] — [`Conversation`](record::Conversation), [`ChatMessage`](record::ChatMessage), content normalization
//! - [`core`] — The analysis engine
//!   - [`core::processor`] — [`Analyzer`](core::Analyzer), the conversation walker
//!   - [`core::text`] — Per-message feature extraction
//!   - [`core::sentiment`] — Pluggable sentiment scorers
//!   - [`core::reducer`] — Derived statistics
//!   - [`core::calendar`] — Calendar cells and streaks
//!   - [`core::filter`] — [`FilterConfig`](core::FilterConfig), [`apply_filters`](core::apply_filters)
//!   - [`core::output`] — [`write_json`](core::write_json), [`write_csv`](core::write_csv), [`render_html`](core::render_html)
//! - [`format`] — [`OutputFormat`](format::OutputFormat) and format dispatch
//! - [`config`] — Configuration types
//! - [`progress`] — Progress callbacks
//! - [`cli`] — CLI types (feature `cli`)
//! - [`error`] — Unified error types ([`ChatpulseError`], [`Result`])
//! - [`prelude`] — Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
#[cfg(feature = "cli")]
pub mod logging;
pub mod parser;
pub mod progress;
pub mod record;

// Re-export the main types at the crate root for convenience
pub use error::{ChatpulseError, Result};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatpulse::prelude::*;
/// ```
pub mod prelude {
    // Error types
    pub use crate::error::{ChatpulseError, Result};

    // Records and loading
    pub use crate::parser::{ExportDocument, ExportParser};
    pub use crate::record::{ChatMessage, Content, Conversation, Role};

    // Configuration
    pub use crate::config::{AnalysisConfig, Config, InputConfig};
    pub use crate::core::sentiment::SentimentBackend;
    pub use crate::core::temporal::TimeBasis;
    pub use crate::core::text::CodeDetection;

    // Filtering
    pub use crate::core::filter::{FilterConfig, apply_filters};

    // Analysis
    pub use crate::core::processor::{Analyzer, analyze};
    pub use crate::core::report::StatsReport;

    // Output (file writers and string converters)
    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    pub use crate::core::output::{render_html, to_json, write_html, write_json};
    pub use crate::format::{OutputFormat, write_to_format};

    // Progress
    pub use crate::progress::{Progress, ProgressCallback};
}
