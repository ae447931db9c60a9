//! Output format types for the chatpulse library.
//!
//! This module provides library-first format types that don't depend on CLI
//! frameworks.
//!
//! # Example
//!
//! ```rust
//! # fn example() -> chatpulse::Result<()> {
//! use chatpulse::format::{OutputFormat, write_to_format};
//! use chatpulse::core::report::StatsReport;
//!
//! let report = StatsReport::default();
//!
//! // Write using format enum
//! write_to_format(&report, "stats.json", OutputFormat::Json, None)?;
//!
//! // Or use format detection from extension
//! let format = OutputFormat::from_path("report.html")?;
//! assert_eq!(format, OutputFormat::Html);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::output::render_html;
use crate::core::report::StatsReport;
use crate::error::ChatpulseError;

/// Report page used when no template is supplied.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/report.html");

/// Output format for the statistics document.
///
/// - [`Json`](OutputFormat::Json) - The complete document
/// - [`Csv`](OutputFormat::Csv) - The calendar series only
/// - [`Html`](OutputFormat::Html) - The document embedded in a report page
///
/// # Example
///
/// ```rust
/// use chatpulse::format::OutputFormat;
/// use std::str::FromStr;
///
/// let format = OutputFormat::from_str("html").unwrap();
/// assert_eq!(format, OutputFormat::Html);
/// assert_eq!(format.extension(), "html");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Pretty-printed JSON document (default)
    #[default]
    Json,

    /// Calendar cells as `date;count;level;special`
    Csv,

    /// Report template with the document embedded
    Html,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Html => "html",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["json", "csv", "html"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Json, OutputFormat::Csv, OutputFormat::Html]
    }

    /// Returns the MIME type for this format.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatpulse::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Html.mime_type(), "text/html");
    /// ```
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Csv => "text/csv",
            OutputFormat::Html => "text/html",
        }
    }

    /// Detects format from a file path based on extension.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatpulse::format::OutputFormat;
    ///
    /// let format = OutputFormat::from_path("calendar.csv").unwrap();
    /// assert_eq!(format, OutputFormat::Csv);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ChatpulseError> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "html" | "htm" => Ok(OutputFormat::Html),
            _ => Err(ChatpulseError::invalid_format(
                "output",
                format!(
                    "Unknown file extension: '.{}'. Expected one of: {}",
                    ext,
                    OutputFormat::all_names().join(", ")
                ),
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Html => write!(f, "HTML"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "html" | "htm" => Ok(OutputFormat::Html),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

/// Writes the report to a file in the specified format.
///
/// `template` is only read for [`OutputFormat::Html`]; without one the
/// built-in [`DEFAULT_TEMPLATE`] is used.
///
/// # Errors
///
/// Returns an error if:
/// - The required feature for the format is not enabled
/// - The template cannot be read or has no placeholder
/// - The file cannot be written
pub fn write_to_format(
    report: &StatsReport,
    path: impl AsRef<Path>,
    format: OutputFormat,
    template: Option<&Path>,
) -> Result<(), ChatpulseError> {
    let content = to_format_string(report, format, template)?;
    std::fs::write(path.as_ref(), content)?;
    tracing::info!(path = %path.as_ref().display(), %format, "wrote report");
    Ok(())
}

/// Converts the report to a string in the specified format.
#[allow(unused_variables)]
pub fn to_format_string(
    report: &StatsReport,
    format: OutputFormat,
    template: Option<&Path>,
) -> Result<String, ChatpulseError> {
    match format {
        OutputFormat::Json => crate::core::output::to_json(report),
        OutputFormat::Html => match template {
            Some(path) => render_html(&std::fs::read_to_string(path)?, report),
            None => render_html(DEFAULT_TEMPLATE, report),
        },
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(report),
        #[allow(unreachable_patterns)]
        _ => Err(ChatpulseError::invalid_format(
            "output",
            format!("Output format {format:?} requires the 'csv-output' feature to be enabled"),
        )),
    }
}
