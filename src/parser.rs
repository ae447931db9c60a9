//! Loading conversation exports.
//!
//! [`ExportParser`] is the single entry point for reading an export. It
//! accepts either the record-set file itself or an extracted export
//! directory, which is searched recursively for `conversations.json`.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> chatpulse::Result<()> {
//! use chatpulse::parser::ExportParser;
//!
//! let parser = ExportParser::new();
//!
//! // An extracted export directory...
//! let export = parser.parse("chatgpt-export/")?;
//! println!("{} conversations", export.conversations.len());
//!
//! // ...or the record-set file directly
//! let export = parser.parse("chatgpt-export/conversations.json")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Failure Policy
//!
//! Problems with the document as a whole (missing file, oversized input,
//! invalid JSON, a top-level value that is not a list) are errors. Problems
//! with a single record are not: the record is converted with defaults and
//! still counted.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::config::InputConfig;
use crate::error::{ChatpulseError, Result};
use crate::record::{Conversation, value_kind};

/// A loaded export: the record set plus the optional profile document.
#[derive(Debug, Clone, Default)]
pub struct ExportDocument {
    /// Conversations in document order
    pub conversations: Vec<Conversation>,

    /// Contents of the profile file, when present and valid JSON
    pub user_profile: Option<Value>,

    /// The record-set file that was read
    pub source: Option<PathBuf>,
}

/// Reads conversation exports from disk or memory.
#[derive(Debug, Clone, Default)]
pub struct ExportParser {
    config: InputConfig,
}

impl ExportParser {
    /// Creates a parser with the default input configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with a custom configuration.
    pub fn with_config(config: InputConfig) -> Self {
        Self { config }
    }

    /// Sets the maximum record-set size in bytes.
    #[must_use]
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.config.max_size_bytes = bytes;
        self
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Returns the record-set file for `path`.
    ///
    /// A file path is returned unchanged. A directory is searched
    /// recursively; the shallowest match wins, ties broken by file name
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::NotFound`] if a directory has no record-set
    /// file, and [`ChatpulseError::Io`] if `path` does not exist.
    pub fn locate(&self, path: &Path) -> Result<PathBuf> {
        let metadata = fs::metadata(path)?;
        if !metadata.is_dir() {
            return Ok(path.to_path_buf());
        }

        WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unreadable directory entry");
                    None
                }
            })
            .filter(|entry| {
                entry.file_type().is_file()
                    && entry.file_name().to_str() == Some(self.config.conversations_file.as_str())
            })
            .min_by_key(|entry| entry.depth())
            .map(|entry| entry.into_path())
            .ok_or_else(|| ChatpulseError::not_found(&self.config.conversations_file, path))
    }

    /// Loads an export from a record-set file or an export directory.
    ///
    /// The profile file is looked up next to the record set. A missing or
    /// unreadable profile is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError`] if:
    /// - The record set cannot be found or read ([`ChatpulseError::NotFound`], [`ChatpulseError::Io`])
    /// - It exceeds the size limit ([`ChatpulseError::InputTooLarge`])
    /// - It is not valid JSON ([`ChatpulseError::Parse`])
    /// - Its top-level value is not a list ([`ChatpulseError::InvalidFormat`])
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<ExportDocument> {
        let file = self.locate(path.as_ref())?;

        let size = fs::metadata(&file)?.len();
        self.check_size(size)?;

        let content = fs::read_to_string(&file)?;
        let conversations = self
            .parse_str(&content)
            .map_err(|err| match err {
                ChatpulseError::Parse { source, .. } => ChatpulseError::parse(source, Some(file.clone())),
                other => other,
            })?;

        let user_profile = file
            .parent()
            .map(|dir| dir.join(&self.config.profile_file))
            .and_then(|profile| load_profile(&profile));

        tracing::info!(
            path = %file.display(),
            bytes = size,
            conversations = conversations.len(),
            profile = user_profile.is_some(),
            "loaded export"
        );

        Ok(ExportDocument {
            conversations,
            user_profile,
            source: Some(file),
        })
    }

    /// Parses a record-set document held in memory.
    ///
    /// # Errors
    ///
    /// Same as [`parse`](Self::parse), minus the file-system failures.
    pub fn parse_str(&self, content: &str) -> Result<Vec<Conversation>> {
        self.check_size(content.len() as u64)?;

        let value: Value = serde_json::from_str(content).map_err(|e| ChatpulseError::parse(e, None))?;
        let Value::Array(records) = value else {
            return Err(ChatpulseError::invalid_format(
                "conversations.json",
                format!("expected a list of conversations, found {}", value_kind(&value)),
            ));
        };

        Ok(records.iter().map(Conversation::from_value).collect())
    }

    fn check_size(&self, size: u64) -> Result<()> {
        if size > self.config.max_size_bytes {
            return Err(ChatpulseError::input_too_large(self.config.max_size_bytes, size));
        }
        Ok(())
    }
}

fn load_profile(path: &Path) -> Option<Value> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unparsable profile");
            None
        }
    }
}
