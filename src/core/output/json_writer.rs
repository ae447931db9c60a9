//! JSON output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::report::StatsReport;
use crate::error::Result;

/// Writes the statistics document to a JSON file.
///
/// # Format
/// ```json
/// {
///   "total_conversations": 2,
///   "daily_activity": {"2022-11-30": 1, "2022-12-01": 1},
///   ...
/// }
/// ```
pub fn write_json(report: &StatsReport, output_path: impl AsRef<Path>) -> Result<()> {
    let json = to_json(report)?;
    let mut file = File::create(output_path.as_ref())?;
    file.write_all(json.as_bytes())?;
    tracing::info!(path = %output_path.as_ref().display(), bytes = json.len(), "wrote JSON report");
    Ok(())
}

/// Converts the statistics document to a pretty-printed JSON string.
///
/// Same format as `write_json`, but returns a String instead of writing to file.
/// Non-ASCII text (titles, emojis, `español`) is kept as-is, not escaped.
pub fn to_json(report: &StatsReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
