//! Sentiment scoring backends.
//!
//! Sentiment is an injected capability: a [`SentimentScorer`] is chosen once
//! when the analyzer is built and used for every message. Two backends ship
//! with the crate:
//!
//! - [`LexiconScorer`] - a bilingual (English/Spanish) polarity lexicon with
//!   negation and intensifier handling
//! - [`NeutralScorer`] - always returns `0.0`, for runs where sentiment is
//!   not wanted
//!
//! # Example
//!
//! ```
//! use chatpulse::core::sentiment::{SentimentBackend, create_scorer};
//!
//! let scorer = create_scorer(SentimentBackend::Lexicon);
//! assert!(scorer.polarity("This is a great idea").unwrap() > 0.1);
//!
//! let stub = create_scorer(SentimentBackend::Neutral);
//! assert_eq!(stub.polarity("This is a great idea").unwrap(), 0.0);
//! ```

use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Scores the polarity of a text in `[-1.0, 1.0]`.
///
/// Implementations may fail; the text analyzer treats any error as a
/// neutral score.
pub trait SentimentScorer: Send + Sync {
    /// Returns the human-readable name of this backend.
    fn name(&self) -> &'static str;

    /// Returns the polarity of `text`.
    fn polarity(&self, text: &str) -> Result<f64>;
}

/// Available sentiment backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentBackend {
    /// Built-in polarity lexicon
    #[default]
    Lexicon,
    /// Always neutral
    Neutral,
}

impl std::fmt::Display for SentimentBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentBackend::Lexicon => write!(f, "Lexicon"),
            SentimentBackend::Neutral => write!(f, "Neutral"),
        }
    }
}

impl std::str::FromStr for SentimentBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lexicon" => Ok(SentimentBackend::Lexicon),
            "neutral" | "none" | "off" => Ok(SentimentBackend::Neutral),
            _ => Err(format!(
                "Unknown sentiment backend: '{}'. Expected one of: lexicon, neutral",
                s
            )),
        }
    }
}

/// Creates the scorer for a backend.
pub fn create_scorer(backend: SentimentBackend) -> Box<dyn SentimentScorer> {
    match backend {
        SentimentBackend::Lexicon => Box::new(LexiconScorer::new()),
        SentimentBackend::Neutral => Box::new(NeutralScorer),
    }
}

/// Scorer that always reports a neutral polarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralScorer;

impl SentimentScorer for NeutralScorer {
    fn name(&self) -> &'static str {
        "Neutral"
    }

    fn polarity(&self, _text: &str) -> Result<f64> {
        Ok(0.0)
    }
}

/// Word-level polarity lexicon.
static POLARITY: phf::Map<&'static str, f64> = phf_map! {
    // English, positive
    "good" => 0.7,
    "great" => 0.8,
    "excellent" => 1.0,
    "amazing" => 0.6,
    "awesome" => 1.0,
    "wonderful" => 1.0,
    "fantastic" => 0.4,
    "perfect" => 1.0,
    "best" => 1.0,
    "better" => 0.5,
    "nice" => 0.6,
    "happy" => 0.8,
    "love" => 0.5,
    "like" => 0.2,
    "helpful" => 0.6,
    "useful" => 0.3,
    "easy" => 0.43,
    "clear" => 0.1,
    "beautiful" => 0.85,
    "brilliant" => 0.9,
    "glad" => 0.5,
    "interesting" => 0.5,
    "cool" => 0.35,
    "fun" => 0.3,
    "correct" => 0.3,
    "works" => 0.2,
    "thanks" => 0.2,
    "success" => 0.3,
    "successful" => 0.75,
    "fast" => 0.2,
    "clean" => 0.37,
    "elegant" => 0.5,
    "right" => 0.29,
    // English, negative
    "bad" => -0.7,
    "worse" => -0.4,
    "worst" => -1.0,
    "terrible" => -1.0,
    "awful" => -1.0,
    "horrible" => -1.0,
    "poor" => -0.4,
    "wrong" => -0.5,
    "broken" => -0.4,
    "hate" => -0.8,
    "sad" => -0.5,
    "angry" => -0.5,
    "annoying" => -0.8,
    "confusing" => -0.3,
    "difficult" => -0.5,
    "hard" => -0.29,
    "slow" => -0.3,
    "ugly" => -0.7,
    "useless" => -0.5,
    "stupid" => -0.8,
    "fail" => -0.5,
    "failed" => -0.5,
    "error" => -0.2,
    "problem" => -0.2,
    "impossible" => -0.67,
    "boring" => -1.0,
    "frustrating" => -0.6,
    // Spanish, positive
    "bueno" => 0.7,
    "buena" => 0.7,
    "excelente" => 1.0,
    "genial" => 0.8,
    "perfecto" => 1.0,
    "mejor" => 0.5,
    "feliz" => 0.8,
    "increíble" => 0.6,
    "útil" => 0.4,
    "fácil" => 0.43,
    "bonito" => 0.7,
    "encanta" => 0.6,
    "correcto" => 0.3,
    "claro" => 0.1,
    "gracias" => 0.2,
    // Spanish, negative
    "malo" => -0.7,
    "mala" => -0.7,
    "peor" => -0.6,
    "problema" => -0.2,
    "difícil" => -0.5,
    "triste" => -0.5,
    "odio" => -0.8,
    "incorrecto" => -0.5,
    "lento" => -0.3,
    "inútil" => -0.5,
    "aburrido" => -1.0,
};

/// Multipliers applied to the next polar word.
static MODIFIERS: phf::Map<&'static str, f64> = phf_map! {
    "not" => -0.5,
    "never" => -0.5,
    "no" => -0.5,
    "don't" => -0.5,
    "isn't" => -0.5,
    "doesn't" => -0.5,
    "nunca" => -0.5,
    "very" => 1.3,
    "really" => 1.3,
    "so" => 1.2,
    "extremely" => 1.5,
    "super" => 1.3,
    "muy" => 1.3,
    "bastante" => 1.2,
    "súper" => 1.3,
};

/// Lexicon-backed polarity scorer.
///
/// The polarity of a text is the mean of the polarities of the lexicon
/// words it contains. A negation (`not`, `no`, `nunca`, ...) immediately
/// before a polar word scales it by `-0.5`; an intensifier (`very`, `muy`,
/// ...) scales it up. Texts with no lexicon words score `0.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    /// Creates a new lexicon scorer.
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for LexiconScorer {
    fn name(&self) -> &'static str {
        "Lexicon"
    }

    fn polarity(&self, text: &str) -> Result<f64> {
        let lower = text.to_lowercase();
        let mut scores = Vec::new();
        let mut modifier: Option<f64> = None;

        for token in lower
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
        {
            if let Some(&polarity) = POLARITY.get(token) {
                let scaled = polarity * modifier.take().unwrap_or(1.0);
                scores.push(scaled.clamp(-1.0, 1.0));
            } else if let Some(&m) = MODIFIERS.get(token) {
                modifier = Some(modifier.map_or(m, |prev| prev * m));
            } else {
                modifier = None;
            }
        }

        if scores.is_empty() {
            return Ok(0.0);
        }
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        Ok(mean.clamp(-1.0, 1.0))
    }
}
