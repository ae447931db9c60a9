//! Tests for output writers (JSON, CSV, HTML)

use std::fs;

use chatpulse::core::output::STATS_PLACEHOLDER;
use chatpulse::format::{DEFAULT_TEMPLATE, to_format_string};
use chatpulse::prelude::*;
use tempfile::tempdir;

// 2022-11-30T12:00:00Z, 2022-12-01T12:00:00Z, 2023-06-15T12:00:00Z
const TIMES: [f64; 3] = [1_669_809_600.0, 1_669_896_000.0, 1_686_830_400.0];

fn sample_report() -> StatsReport {
    let conversations: Vec<Conversation> = TIMES
        .iter()
        .enumerate()
        .map(|(i, t)| {
            Conversation::new(format!("Chat {i} </script>"))
                .with_create_time(*t)
                .with_message(ChatMessage::new(Role::User, "Can you help me with Rust? 🚀"))
                .with_message(ChatMessage::new(
                    Role::Assistant,
                    "Sure, here is an example:\n```rust\nfn main() {}\n```",
                ))
        })
        .collect();
    analyze(
        &conversations,
        &AnalysisConfig::new().with_time_basis(TimeBasis::Utc),
    )
}

// ============================================================================
// JSON Writer Tests
// ============================================================================

mod json_writer_tests {
    use super::*;

    #[test]
    fn test_write_json_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.json");

        write_json(&sample_report(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["total_conversations"], 3);
        assert_eq!(value["total_messages"], 6);
        assert_eq!(value["code_blocks"], 3);
        assert_eq!(value["daily_activity"]["2023-06-15"], 1);
        assert_eq!(value["emojis_used"]["🚀"], 3);
    }

    #[test]
    fn test_json_is_pretty_printed() {
        let json = to_json(&sample_report()).unwrap();
        assert!(json.starts_with("{\n"));
        assert!(json.contains("\n  \"total_conversations\": 3"));
    }

    #[test]
    fn test_json_field_order_is_stable() {
        let json = to_json(&sample_report()).unwrap();
        let conversations = json.find("\"total_conversations\"").unwrap();
        let daily = json.find("\"daily_activity\"").unwrap();
        let calendar = json.find("\"github_style_data\"").unwrap();
        assert!(conversations < daily);
        assert!(daily < calendar);
    }

    #[test]
    fn test_json_round_trip_preserves_report() {
        let report = sample_report();
        let parsed: StatsReport = serde_json::from_str(&to_json(&report).unwrap()).unwrap();
        assert_eq!(parsed.daily_activity, report.daily_activity);
        assert_eq!(parsed.github_style_data, report.github_style_data);
        assert_eq!(parsed.days_analysis, report.days_analysis);
    }

    #[test]
    fn test_write_json_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("stats.json");
        let err = write_json(&sample_report(), &path).unwrap_err();
        assert!(err.is_io());
    }
}

// ============================================================================
// CSV Writer Tests
// ============================================================================

#[cfg(feature = "csv-output")]
mod csv_writer_tests {
    use super::*;

    #[test]
    fn test_write_csv_calendar() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("calendar.csv");

        write_csv(&sample_report(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "date;count;level;special");
        // 2022 and 2023 in full
        assert_eq!(lines.len(), 1 + 365 + 365);
        assert_eq!(lines[1], "2022-01-01;0;0;");
        assert!(lines.contains(&"2022-11-30;1;1;launch"));
        assert!(lines.contains(&"2023-06-15;1;1;"));
        assert_eq!(lines[lines.len() - 1], "2023-12-31;0;0;");
    }

    #[test]
    fn test_csv_is_readable_by_csv_crate() {
        let csv_text = to_csv(&sample_report()).unwrap();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_reader(csv_text.as_bytes());

        let active: Vec<_> = reader
            .records()
            .map(|r| r.unwrap())
            .filter(|r| &r[1] != "0")
            .collect();
        assert_eq!(active.len(), 3);
        assert_eq!(&active[0][0], "2022-11-30");
    }
}

// ============================================================================
// HTML Writer Tests
// ============================================================================

mod html_writer_tests {
    use super::*;

    #[test]
    fn test_write_html_with_template() {
        let dir = tempdir().unwrap();
        let template = dir.path().join("template.html");
        let output = dir.path().join("report.html");
        fs::write(
            &template,
            "<html><body><script>\nlet statsData = null;\ndraw(statsData);\n</script></body></html>",
        )
        .unwrap();

        write_html(&sample_report(), &template, &output).unwrap();

        let page = fs::read_to_string(&output).unwrap();
        assert!(!page.contains(STATS_PLACEHOLDER));
        assert!(page.contains("let statsData = {"));
        assert!(page.contains("\"total_conversations\":3"));
        assert!(page.contains("draw(statsData);"));
    }

    #[test]
    fn test_titles_cannot_close_script_tag() {
        let page = render_html("<script>let statsData = null;</script>", &sample_report()).unwrap();
        assert_eq!(page.matches("</script>").count(), 1);
        assert!(page.contains("Chat 0 <\\/script>"));
    }

    #[test]
    fn test_template_without_placeholder() {
        let err = render_html("<html></html>", &sample_report()).unwrap_err();
        assert!(err.is_template());
    }

    #[test]
    fn test_missing_template_file() {
        let dir = tempdir().unwrap();
        let err = write_html(
            &sample_report(),
            dir.path().join("nope.html"),
            dir.path().join("out.html"),
        )
        .unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_default_template_has_placeholder() {
        assert!(DEFAULT_TEMPLATE.contains(STATS_PLACEHOLDER));
        let page = render_html(DEFAULT_TEMPLATE, &sample_report()).unwrap();
        assert!(page.contains("\"total_messages\":6"));
    }
}

// ============================================================================
// Format Dispatch Tests
// ============================================================================

mod format_tests {
    use super::*;

    #[test]
    fn test_write_to_format_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_to_format(&sample_report(), &path, OutputFormat::Json, None).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("\"total_conversations\": 3"));
    }

    #[test]
    fn test_write_to_format_html_default_template() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.html");
        write_to_format(&sample_report(), &path, OutputFormat::Html, None).unwrap();

        let page = fs::read_to_string(&path).unwrap();
        assert!(page.contains("<html"));
        assert!(!page.contains(STATS_PLACEHOLDER));
    }

    #[cfg(feature = "csv-output")]
    #[test]
    fn test_write_to_format_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_to_format(&sample_report(), &path, OutputFormat::Csv, None).unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("date;count;level;special"));
    }

    #[test]
    fn test_format_detected_from_path() {
        for (name, format) in [
            ("stats.json", OutputFormat::Json),
            ("calendar.CSV", OutputFormat::Csv),
            ("page.htm", OutputFormat::Html),
        ] {
            assert_eq!(OutputFormat::from_path(name).unwrap(), format);
        }
        assert!(OutputFormat::from_path("notes.txt").is_err());
    }

    #[test]
    fn test_to_format_string_matches_writers() {
        let report = sample_report();
        assert_eq!(
            to_format_string(&report, OutputFormat::Json, None).unwrap(),
            to_json(&report).unwrap()
        );
    }
}
