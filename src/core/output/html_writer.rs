//! HTML report writer.
//!
//! A report template is any HTML page containing the line
//! `let statsData = null;`. Rendering replaces it with the JSON document so
//! the page's own scripts can draw charts from `statsData`.

use std::fs;
use std::path::Path;

use crate::core::report::StatsReport;
use crate::error::{ChatpulseError, Result};

/// The statement replaced with the statistics document.
pub const STATS_PLACEHOLDER: &str = "let statsData = null;";

/// Embeds `report` into `template`.
///
/// Only the first occurrence of [`STATS_PLACEHOLDER`] is replaced.
///
/// # Errors
///
/// Returns [`ChatpulseError::Template`] if the placeholder is missing.
pub fn render_html(template: &str, report: &StatsReport) -> Result<String> {
    if !template.contains(STATS_PLACEHOLDER) {
        return Err(ChatpulseError::template(format!(
            "placeholder `{STATS_PLACEHOLDER}` not found in template"
        )));
    }

    // A `</script>` inside a title must not close the surrounding tag.
    let json = serde_json::to_string(report)?.replace("</", "<\\/");
    Ok(template.replacen(STATS_PLACEHOLDER, &format!("let statsData = {json};"), 1))
}

/// Reads the template at `template_path`, renders it and writes the page.
pub fn write_html(
    report: &StatsReport,
    template_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<()> {
    let template = fs::read_to_string(template_path.as_ref())?;
    let page = render_html(&template, report)?;
    fs::write(output_path.as_ref(), page)?;
    tracing::info!(path = %output_path.as_ref().display(), "wrote HTML report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "<html><script>\nlet statsData = null;\nrender(statsData);\n</script></html>";

    #[test]
    fn test_render_replaces_placeholder() {
        let report = StatsReport {
            total_conversations: 7,
            ..StatsReport::default()
        };

        let page = render_html(TEMPLATE, &report).unwrap();
        assert!(!page.contains(STATS_PLACEHOLDER));
        assert!(page.contains(r#"let statsData = {"total_conversations":7"#));
        assert!(page.contains("render(statsData);"));
    }

    #[test]
    fn test_render_missing_placeholder() {
        let err = render_html("<html></html>", &StatsReport::default()).unwrap_err();
        assert!(matches!(err, ChatpulseError::Template { .. }));
    }

    #[test]
    fn test_render_escapes_closing_tags() {
        let report = StatsReport {
            conversation_titles: vec!["</script><b>".to_string()],
            ..StatsReport::default()
        };

        let page = render_html(TEMPLATE, &report).unwrap();
        assert_eq!(page.matches("</script>").count(), 1);
    }

    #[test]
    fn test_write_html_file() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.html");
        let output = dir.path().join("report.html");
        fs::write(&template, TEMPLATE).unwrap();

        write_html(&StatsReport::default(), &template, &output).unwrap();
        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("let statsData = {"));
    }
}
