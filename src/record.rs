//! Conversation records from a ChatGPT data export.
//!
//! An export's `conversations.json` is a list of records, each carrying a
//! title, a creation timestamp and a `mapping` of node ids to nodes. A node
//! may or may not wrap a message:
//!
//! ```json
//! {
//!   "id": "c0ffee",
//!   "title": "Rust lifetimes",
//!   "create_time": 1700000000.123,
//!   "mapping": {
//!     "root": {"id": "root", "message": null, "children": ["n1"]},
//!     "n1": {
//!       "id": "n1",
//!       "parent": "root",
//!       "message": {
//!         "author": {"role": "user"},
//!         "content": {"content_type": "text", "parts": ["Explain lifetimes please"]}
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Records are converted leniently: the shape of real exports drifts over
//! time, and one odd record must never prevent the rest from being analyzed.
//! Every conversion here is infallible and falls back to a documented
//! default (empty text, no timestamp, [`Role::Unknown`]).
//!
//! # Example
//!
//! ```
//! use chatpulse::record::{ChatMessage, Conversation, Role};
//!
//! let conv = Conversation::new("Greetings")
//!     .with_create_time(1_700_000_000.0)
//!     .with_message(ChatMessage::new(Role::User, "Hello there!"));
//!
//! assert_eq!(conv.messages().count(), 1);
//! assert_eq!(conv.title(), "Greetings");
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Title used when a record has none.
pub const UNTITLED: &str = "Untitled";

/// Author role of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person who exported the data
    User,
    /// The model
    Assistant,
    /// System prompts and hidden context
    System,
    /// Missing author or any role this crate does not model (e.g. `tool`)
    #[default]
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Parses a role string; anything unrecognized is [`Role::Unknown`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "system" => Role::System,
            _ => Role::Unknown,
        }
    }

    /// Returns the lowercase name used in the statistics document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Unknown => "unknown",
        }
    }

    /// Returns all named roles.
    pub fn all() -> &'static [Role] {
        &[Role::User, Role::Assistant, Role::System, Role::Unknown]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Role::parse(s) {
            Role::Unknown if !s.trim().eq_ignore_ascii_case("unknown") => Err(format!(
                "Unknown role: '{}'. Expected one of: user, assistant, system, unknown",
                s
            )),
            role => Ok(role),
        }
    }
}

/// Message content as found in the export.
///
/// The export stores content either as a bare string or as an object with a
/// `parts` list (strings interleaved with opaque attachment objects). Use
/// [`Content::extract_text`] to normalize it to a single text value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Content {
    /// No content, or `null`
    #[default]
    Empty,
    /// A single text value
    Text(String),
    /// A list of parts; only string parts carry text
    Parts(Vec<Value>),
    /// Any other shape, kept verbatim
    Other(Value),
}

impl Content {
    /// Classifies a raw JSON content value.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Content::Empty,
            Value::String(s) => Content::Text(s.clone()),
            Value::Object(obj) => {
                if let Some(Value::Array(parts)) = obj.get("parts") {
                    Content::Parts(parts.clone())
                } else if let Some(Value::String(text)) = obj.get("text") {
                    Content::Text(text.clone())
                } else {
                    Content::Other(value.clone())
                }
            }
            other => Content::Other(other.clone()),
        }
    }

    /// Normalizes the content to a single text value.
    ///
    /// - `Text` is returned as-is
    /// - `Parts` joins string parts with newlines, skipping opaque parts
    /// - `Other` degrades to its JSON rendering
    /// - `Empty` yields an empty string
    pub fn extract_text(&self) -> String {
        match self {
            Content::Empty => String::new(),
            Content::Text(s) => s.clone(),
            Content::Parts(parts) => parts
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("\n"),
            Content::Other(value) => value.to_string(),
        }
    }
}

/// A single message wrapped by a mapping node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatMessage {
    /// Message id, if present
    pub id: Option<String>,
    /// Author role
    pub role: Role,
    /// Raw content
    pub content: Content,
    /// Epoch seconds, if present and positive
    pub create_time: Option<f64>,
}

impl ChatMessage {
    /// Creates a message with plain text content.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: None,
            role,
            content: Content::Text(text.into()),
            create_time: None,
        }
    }

    /// Creates a message with arbitrary content.
    pub fn with_content(role: Role, content: Content) -> Self {
        Self {
            id: None,
            role,
            content,
            create_time: None,
        }
    }

    /// Converts a raw `message` object.
    pub fn from_value(value: &Value) -> Self {
        let role = value
            .get("author")
            .and_then(|a| a.get("role"))
            .and_then(Value::as_str)
            .map(Role::parse)
            .unwrap_or_default();

        Self {
            id: value.get("id").and_then(value_as_string),
            role,
            content: value.get("content").map(Content::from_value).unwrap_or_default(),
            create_time: value.get("create_time").and_then(parse_epoch),
        }
    }

    /// Returns the normalized text of this message.
    pub fn text(&self) -> String {
        self.content.extract_text()
    }
}

/// One entry of a conversation's `mapping`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    /// Node id
    pub id: String,
    /// Wrapped message, if any
    pub message: Option<ChatMessage>,
    /// Parent node id
    pub parent: Option<String>,
    /// Child node ids
    pub children: Vec<String>,
}

impl Node {
    fn from_value(key: &str, value: &Value) -> Self {
        let message = value
            .get("message")
            .filter(|m| m.is_object())
            .map(ChatMessage::from_value);

        Self {
            id: value
                .get("id")
                .and_then(value_as_string)
                .unwrap_or_else(|| key.to_string()),
            message,
            parent: value.get("parent").and_then(value_as_string),
            children: value
                .get("children")
                .and_then(Value::as_array)
                .map(|c| c.iter().filter_map(value_as_string).collect())
                .unwrap_or_default(),
        }
    }
}

/// One conversation record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Conversation {
    /// Conversation id
    pub id: Option<String>,
    /// Title as exported
    pub title: Option<String>,
    /// Creation time in epoch seconds; `None` when absent, zero or invalid
    pub create_time: Option<f64>,
    /// Node id to node, in document order
    pub mapping: IndexMap<String, Node>,
}

impl Conversation {
    /// Creates an empty conversation with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Builder-style method to set the creation time.
    #[must_use]
    pub fn with_create_time(mut self, epoch_secs: f64) -> Self {
        self.create_time = normalize_epoch(epoch_secs);
        self
    }

    /// Builder-style method to set the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder-style method to append a message in a new node.
    #[must_use]
    pub fn with_message(mut self, message: ChatMessage) -> Self {
        let id = format!("node-{}", self.mapping.len());
        let parent = self.mapping.keys().last().cloned();
        self.mapping.insert(
            id.clone(),
            Node {
                id,
                message: Some(message),
                parent,
                children: Vec::new(),
            },
        );
        self
    }

    /// Converts a raw record. Never fails: a non-object value yields an
    /// empty conversation so it is still counted.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            tracing::debug!(kind = value_kind(value), "record is not an object, treating as empty");
            return Self::default();
        };

        let mapping = obj
            .get("mapping")
            .and_then(Value::as_object)
            .map(|m| {
                m.iter()
                    .map(|(key, node)| (key.clone(), Node::from_value(key, node)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: obj.get("id").and_then(value_as_string),
            title: obj.get("title").and_then(Value::as_str).map(ToString::to_string),
            create_time: obj.get("create_time").and_then(parse_epoch),
            mapping,
        }
    }

    /// Returns the title, or [`UNTITLED`] when missing.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    /// Iterates over the messages wrapped by mapping nodes, in document order.
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.mapping.values().filter_map(|node| node.message.as_ref())
    }
}

/// Parses an epoch-seconds value that may be a number or a numeric string.
///
/// Returns `None` for zero, negative, non-finite or non-numeric values and
/// for anything past [`MAX_EPOCH_SECS`]: those all mean "no temporal data".
pub fn parse_epoch(value: &Value) -> Option<f64> {
    let secs = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    normalize_epoch(secs)
}

/// 9999-12-31T23:59:59Z. Millisecond timestamps land far beyond it.
pub const MAX_EPOCH_SECS: f64 = 253_402_300_799.0;

fn normalize_epoch(secs: f64) -> Option<f64> {
    if !(secs.is_finite() && secs > 0.0) {
        return None;
    }
    if secs > MAX_EPOCH_SECS {
        tracing::debug!(create_time = secs, "timestamp past year 9999, no temporal data");
        return None;
    }
    Some(secs)
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
