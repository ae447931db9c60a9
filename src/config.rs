//! Configuration types for loading and analysis.
//!
//! This module provides clean configuration structs for library usage,
//! without any CLI framework dependencies. Every struct has defaults and is
//! `serde`-deserializable, so a partial JSON file only needs the keys it
//! overrides.
//!
//! - [`AnalysisConfig`] - top-N limits, sentiment backend, time basis, roles
//! - [`InputConfig`] - file names and the input size limit
//! - [`LoggingConfig`] - default log level
//! - [`Config`] - all of the above, loadable with [`Config::from_file`]
//!
//! # Example
//!
//! ```rust
//! use chatpulse::config::AnalysisConfig;
//! use chatpulse::core::sentiment::SentimentBackend;
//! use chatpulse::core::temporal::TimeBasis;
//!
//! let config = AnalysisConfig::new()
//!     .with_sentiment(SentimentBackend::Neutral)
//!     .with_time_basis(TimeBasis::Utc)
//!     .with_top_words(25);
//!
//! assert_eq!(config.top_words, 25);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::calendar::Anniversary;
use crate::core::sentiment::SentimentBackend;
use crate::core::temporal::TimeBasis;
use crate::core::text::CodeDetection;
use crate::error::{ChatpulseError, Result};
use crate::record::Role;

/// Default input size limit: 100 MB.
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 100 * 1024 * 1024;

/// Configuration for one analysis run.
///
/// # Example
///
/// ```rust
/// use chatpulse::config::AnalysisConfig;
/// use chatpulse::record::Role;
///
/// let config = AnalysisConfig::new()
///     .with_roles(vec![Role::User])
///     .without_anniversary();
///
/// assert!(config.includes_role(Role::User));
/// assert!(!config.includes_role(Role::Assistant));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Entries kept in `word_frequency` (default: 100)
    pub top_words: usize,

    /// Entries kept in `topics` (default: 50)
    pub top_topics: usize,

    /// Entries kept in `emojis_used` (default: 20)
    pub top_emojis: usize,

    /// Entries kept in `technical_terms` (default: 30)
    pub top_technical_terms: usize,

    /// Entries kept in `programming_languages` (default: 20)
    pub top_programming_languages: usize,

    /// A month is a peak when its count exceeds this multiple of the mean
    /// monthly count (default: 1.5)
    pub peak_multiplier: f64,

    /// Date marked in the calendar (default: 2022-11-30, `launch`)
    pub anniversary: Option<Anniversary>,

    /// Sentiment backend (default: lexicon)
    pub sentiment: SentimentBackend,

    /// Code detection policy (default: fence)
    pub code_detection: CodeDetection,

    /// Timezone for all temporal fields (default: local)
    pub time_basis: TimeBasis,

    /// Analyze only messages from these roles; empty means all roles
    pub roles: Vec<Role>,

    /// Report progress every this many conversations (default: 1000)
    pub progress_interval: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_words: 100,
            top_topics: 50,
            top_emojis: 20,
            top_technical_terms: 30,
            top_programming_languages: 20,
            peak_multiplier: 1.5,
            anniversary: Some(Anniversary::default()),
            sentiment: SentimentBackend::default(),
            code_detection: CodeDetection::default(),
            time_basis: TimeBasis::default(),
            roles: Vec::new(),
            progress_interval: 1000,
        }
    }
}

impl AnalysisConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sentiment backend.
    #[must_use]
    pub fn with_sentiment(mut self, backend: SentimentBackend) -> Self {
        self.sentiment = backend;
        self
    }

    /// Sets the code detection policy.
    #[must_use]
    pub fn with_code_detection(mut self, detection: CodeDetection) -> Self {
        self.code_detection = detection;
        self
    }

    /// Sets the time basis.
    #[must_use]
    pub fn with_time_basis(mut self, basis: TimeBasis) -> Self {
        self.time_basis = basis;
        self
    }

    /// Restricts analysis to messages from `roles`.
    #[must_use]
    pub fn with_roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = roles;
        self
    }

    /// Sets the number of words kept in `word_frequency`.
    #[must_use]
    pub fn with_top_words(mut self, n: usize) -> Self {
        self.top_words = n;
        self
    }

    /// Sets the peak-month multiplier.
    #[must_use]
    pub fn with_peak_multiplier(mut self, multiplier: f64) -> Self {
        self.peak_multiplier = multiplier;
        self
    }

    /// Sets the calendar anniversary.
    #[must_use]
    pub fn with_anniversary(mut self, anniversary: Anniversary) -> Self {
        self.anniversary = Some(anniversary);
        self
    }

    /// Disables the calendar anniversary.
    #[must_use]
    pub fn without_anniversary(mut self) -> Self {
        self.anniversary = None;
        self
    }

    /// Sets the progress reporting interval.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Returns `true` if messages from `role` are analyzed.
    pub fn includes_role(&self, role: Role) -> bool {
        self.roles.is_empty() || self.roles.contains(&role)
    }
}

/// Configuration for locating and loading an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Maximum size of the record-set file in bytes (default: 100MB)
    pub max_size_bytes: u64,

    /// Record-set file searched for in export directories
    pub conversations_file: String,

    /// Optional profile file loaded next to the record set
    pub profile_file: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            conversations_file: "conversations.json".to_string(),
            profile_file: "user.json".to_string(),
        }
    }
}

impl InputConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum input size in bytes.
    #[must_use]
    pub fn with_max_size_bytes(mut self, bytes: u64) -> Self {
        self.max_size_bytes = bytes;
        self
    }

    /// Sets the record-set file name.
    #[must_use]
    pub fn with_conversations_file(mut self, name: impl Into<String>) -> Self {
        self.conversations_file = name.into();
        self
    }

    /// Sets the profile file name.
    #[must_use]
    pub fn with_profile_file(mut self, name: impl Into<String>) -> Self {
        self.profile_file = name.into();
        self
    }
}

/// Logging defaults; `RUST_LOG` takes precedence when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive (default: `info`)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Complete configuration file.
///
/// # Example
///
/// ```rust
/// use chatpulse::config::Config;
///
/// let config: Config = serde_json::from_str(r#"{"analysis": {"top_words": 10}}"#).unwrap();
/// assert_eq!(config.analysis.top_words, 10);
/// assert_eq!(config.input.conversations_file, "conversations.json");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub input: InputConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::Io`] if the file cannot be read and
    /// [`ChatpulseError::InvalidFormat`] if it is not a valid configuration.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&content)
            .map_err(|e| ChatpulseError::invalid_format("config", e.to_string()))
    }
}
