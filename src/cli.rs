//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`ReportFormat`] - Output format options
//!
//! [`Args::build_config`] and [`Args::filter_config`] turn parsed arguments
//! into the library's configuration types, so the binary itself only
//! sequences the stages.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::core::filter::FilterConfig;
use crate::core::sentiment::SentimentBackend;
use crate::core::temporal::TimeBasis;
use crate::core::text::CodeDetection;
use crate::error::Result;
use crate::record::Role;

/// Default output path; its extension follows `--format`.
pub const DEFAULT_OUTPUT: &str = "chatpulse_report.json";

/// Analyze a ChatGPT data export: activity calendar, streaks, sentiment
/// and vocabulary statistics.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatpulse")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatpulse chatgpt-export/
    chatpulse conversations.json -f html -o report.html
    chatpulse export/ --after 2024-01-01 --role user
    chatpulse export/ -f csv --utc
    chatpulse export/ --no-sentiment --config chatpulse.json")]
pub struct Args {
    /// Export directory or conversations.json file
    pub input: String,

    /// Path to output file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,

    /// HTML template containing `let statsData = null;`
    #[arg(long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only conversations on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// Only conversations on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Only conversations whose title contains this text
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Only analyze messages from this role (repeatable)
    #[arg(long = "role", value_name = "ROLE")]
    pub roles: Vec<Role>,

    /// Score every message as neutral
    #[arg(long)]
    pub no_sentiment: bool,

    /// Also count `def ` / `function ` as code, not just ``` fences
    #[arg(long)]
    pub strict_code: bool,

    /// Bucket timestamps in UTC instead of local time
    #[arg(long)]
    pub utc: bool,

    /// Maximum size of conversations.json in megabytes
    #[arg(long, value_name = "N")]
    pub max_size_mb: Option<u64>,

    /// Split the walk over this many threads
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Verbose logging to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Loads `--config` (or defaults) and applies the command-line overrides.
    pub fn build_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if !self.roles.is_empty() {
            config.analysis.roles.clone_from(&self.roles);
        }
        if self.no_sentiment {
            config.analysis.sentiment = SentimentBackend::Neutral;
        }
        if self.strict_code {
            config.analysis.code_detection = CodeDetection::Keywords;
        }
        if self.utc {
            config.analysis.time_basis = TimeBasis::Utc;
        }
        if let Some(mb) = self.max_size_mb {
            config.input.max_size_bytes = mb.saturating_mul(1024 * 1024);
        }
        Ok(config)
    }

    /// Builds the conversation filter, dating conversations with `time_basis`.
    pub fn filter_config(&self, time_basis: TimeBasis) -> Result<FilterConfig> {
        let mut filter = FilterConfig::new().with_time_basis(time_basis);
        if let Some(ref after) = self.after {
            filter = filter.with_date_from(after)?;
        }
        if let Some(ref before) = self.before {
            filter = filter.with_date_to(before)?;
        }
        if let Some(ref title) = self.title {
            filter = filter.with_title(title.clone());
        }
        Ok(filter)
    }

    /// Output path with its extension adjusted to the format when the
    /// default path is used.
    pub fn output_path(&self) -> PathBuf {
        if self.output != DEFAULT_OUTPUT {
            return PathBuf::from(&self.output);
        }
        let lib_format: crate::format::OutputFormat = self.format.into();
        Path::new(DEFAULT_OUTPUT).with_extension(lib_format.extension())
    }
}

/// Output format options.
///
/// - [`Json`](ReportFormat::Json) - Complete statistics document
/// - [`Csv`](ReportFormat::Csv) - Calendar cells, one row per day
/// - [`Html`](ReportFormat::Html) - Rendered report page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Pretty-printed JSON (default)
    #[default]
    Json,

    /// CSV calendar with semicolon delimiter
    Csv,

    /// HTML report page
    #[value(alias = "htm")]
    Html,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::format::OutputFormat::from(*self))
    }
}

// Conversion to library format type
impl From<ReportFormat> for crate::format::OutputFormat {
    fn from(format: ReportFormat) -> crate::format::OutputFormat {
        match format {
            ReportFormat::Json => crate::format::OutputFormat::Json,
            ReportFormat::Csv => crate::format::OutputFormat::Csv,
            ReportFormat::Html => crate::format::OutputFormat::Html,
        }
    }
}
