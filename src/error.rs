//! Unified error types for chatpulse.
//!
//! This module provides a single [`ChatpulseError`] enum that covers every
//! failure the library can surface to a caller. Errors are reserved for
//! input problems (missing file, unparsable document, oversized input) and
//! output problems (I/O, templating). Per-record oddities inside an export
//! never become errors: they are recovered with documented defaults and
//! logged through `tracing`.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - **Developers** get source error chains for debugging

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatpulse operations.
///
/// # Example
///
/// ```rust
/// use chatpulse::error::Result;
/// use chatpulse::record::Conversation;
///
/// fn load() -> Result<Vec<Conversation>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatpulseError>;

/// The error type for all chatpulse operations.
///
/// A caller receives either a complete statistics document or exactly one of
/// these errors; there is no partial output.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatpulseError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The input file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing output)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The export document is not valid JSON.
    #[error("Failed to parse conversation export{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// JSON serialization error while producing output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but does not have the expected structure.
    ///
    /// This occurs when:
    /// - The top-level value of the record set is not a list
    /// - A configuration file has the wrong shape
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// A required file could not be located in an export directory.
    #[error("Could not find {file} under {}", searched.display())]
    NotFound {
        /// Name of the file that was searched for
        file: String,
        /// Directory that was searched
        searched: PathBuf,
    },

    /// The input exceeds the configured size limit.
    #[error("Input too large: {actual_size} bytes (maximum: {max_size} bytes)")]
    InputTooLarge {
        /// Maximum allowed size in bytes
        max_size: u64,
        /// Actual size encountered
        actual_size: u64,
    },

    /// Invalid date format in filter configuration.
    ///
    /// Date filters expect YYYY-MM-DD format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// The HTML template could not be used.
    #[error("Template error: {message}")]
    Template {
        /// Description of the problem
        message: String,
    },

    /// A sentiment backend failed to score a text.
    ///
    /// The text analyzer swallows this error and falls back to a neutral
    /// polarity; it is only visible to code calling a scorer directly.
    #[error("Sentiment scoring failed: {message}")]
    Sentiment {
        /// Description of the failure
        message: String,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<std::string::FromUtf8Error> for ChatpulseError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ChatpulseError::InvalidFormat {
            format: "UTF-8",
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatpulseError {
    /// Creates a parse error for the record-set document.
    pub fn parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        ChatpulseError::Parse { source, path }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatpulseError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates a not-found error for a file searched under `searched`.
    pub fn not_found(file: impl Into<String>, searched: impl Into<PathBuf>) -> Self {
        ChatpulseError::NotFound {
            file: file.into(),
            searched: searched.into(),
        }
    }

    /// Creates an input-too-large error.
    pub fn input_too_large(max_size: u64, actual_size: u64) -> Self {
        ChatpulseError::InputTooLarge {
            max_size,
            actual_size,
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ChatpulseError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates a template error.
    pub fn template(message: impl Into<String>) -> Self {
        ChatpulseError::Template {
            message: message.into(),
        }
    }

    /// Creates a sentiment scoring error.
    pub fn sentiment(message: impl Into<String>) -> Self {
        ChatpulseError::Sentiment {
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatpulseError::Io(_))
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, ChatpulseError::Parse { .. })
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ChatpulseError::InvalidFormat { .. })
    }

    /// Returns `true` if a required file was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChatpulseError::NotFound { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, ChatpulseError::InvalidDate { .. })
    }

    /// Returns `true` if the HTML template could not be used.
    pub fn is_template(&self) -> bool {
        matches!(self, ChatpulseError::Template { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
