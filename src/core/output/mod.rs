//! Output format writers.
//!
//! This module provides writers for the statistics document:
//! - [`write_json`] / [`to_json`] - The full document, pretty-printed
//! - [`write_csv`] / [`to_csv`] - The calendar series with semicolon delimiter - requires `csv-output` feature
//! - [`write_html`] / [`render_html`] - The document embedded in a report template
//!
//! # Choosing a Format
//!
//! | Format | Contents | Use Case |
//! |--------|----------|----------|
//! | JSON | Every metric | APIs, further processing |
//! | CSV | One row per calendar day | Spreadsheets, plotting |
//! | HTML | Every metric, inside a page | Sharing a rendered report |
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "csv-output")]
//! # fn main() -> chatpulse::Result<()> {
//! use chatpulse::core::output::{render_html, to_json, write_csv, write_json};
//! use chatpulse::core::report::StatsReport;
//!
//! let report = StatsReport::default();
//!
//! // Write to files
//! write_json(&report, "stats.json")?;
//! write_csv(&report, "calendar.csv")?;
//!
//! // Or get as strings
//! let json = to_json(&report)?;
//! let page = render_html("<script>let statsData = null;</script>", &report)?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "csv-output"))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
mod html_writer;
mod json_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
pub use html_writer::{STATS_PLACEHOLDER, render_html, write_html};
pub use json_writer::{to_json, write_json};
