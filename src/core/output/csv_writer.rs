//! CSV output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::report::StatsReport;
use crate::error::Result;

const HEADER: [&str; 4] = ["date", "count", "level", "special"];

/// Writes the calendar-complete series to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: `date`, `count`, `level`, `special`
/// - One row per day of every year with activity; `special` holds the
///   anniversary label or is empty
/// - Encoding: UTF-8
pub fn write_csv(report: &StatsReport, output_path: impl AsRef<Path>) -> Result<()> {
    let csv = to_csv(report)?;
    let mut file = File::create(output_path.as_ref())?;
    file.write_all(csv.as_bytes())?;
    tracing::info!(
        path = %output_path.as_ref().display(),
        rows = report.github_style_data.len(),
        "wrote CSV calendar"
    );
    Ok(())
}

/// Converts the calendar-complete series to a CSV string.
///
/// Same format as `write_csv`, but returns a String instead of writing to file.
pub fn to_csv(report: &StatsReport) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for cell in &report.github_style_data {
        writer.write_record([
            cell.date.format("%Y-%m-%d").to_string(),
            cell.count.to_string(),
            cell.level.to_string(),
            cell.special_level.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::core::calendar::{Anniversary, github_style_data};

    fn report_for(days: &[(&str, u64)]) -> StatsReport {
        let daily: BTreeMap<NaiveDate, u64> = days
            .iter()
            .map(|(d, c)| (NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap(), *c))
            .collect();
        StatsReport {
            github_style_data: github_style_data(&daily, Some(&Anniversary::default())),
            ..StatsReport::default()
        }
    }

    #[test]
    fn test_to_csv_basic() {
        let csv = to_csv(&report_for(&[("2023-06-15", 4)])).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "date;count;level;special");
        assert_eq!(lines.len(), 1 + 365);
        assert!(lines.contains(&"2023-06-15;4;2;"));
        assert!(lines.contains(&"2023-01-01;0;0;"));
    }

    #[test]
    fn test_to_csv_marks_anniversary() {
        let csv = to_csv(&report_for(&[("2022-11-30", 1)])).unwrap();
        assert!(csv.contains("2022-11-30;1;1;launch"));
    }

    #[test]
    fn test_to_csv_empty_report_is_header_only() {
        let csv = to_csv(&StatsReport::default()).unwrap();
        assert_eq!(csv.trim_end(), "date;count;level;special");
    }

    #[test]
    fn test_write_csv_file() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        write_csv(&report_for(&[("2024-02-29", 11)]), temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("2024-02-29;11;4;"));
        // leap year
        assert_eq!(content.lines().count(), 1 + 366);
    }
}
