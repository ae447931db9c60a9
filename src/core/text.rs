//! Per-message text feature extraction.
//!
//! [`TextAnalyzer::analyze`] turns one text unit into a fixed-shape
//! [`TextFeatures`] bundle. It never fails: a sentiment backend error is
//! logged and scored as neutral, and empty text yields zeroed features.
//!
//! # Example
//!
//! ```
//! use chatpulse::core::sentiment::{SentimentBackend, create_scorer};
//! use chatpulse::core::text::{CodeDetection, InteractionPattern, SentimentClass, TextAnalyzer};
//!
//! let analyzer = TextAnalyzer::new(create_scorer(SentimentBackend::Lexicon), CodeDetection::Fence);
//! let features = analyzer.analyze("Thank you, this is great! See https://example.com");
//!
//! assert_eq!(features.sentiment, SentimentClass::Positive);
//! assert_eq!(features.url_count, 1);
//! assert!(features.interaction_patterns.contains(&InteractionPattern::Gratitude));
//! ```

use std::sync::LazyLock;

use phf::phf_set;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::sentiment::SentimentScorer;

/// Polarity strictly above this is positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;

/// Polarity strictly below this is negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Technical vocabulary, matched as case-insensitive substrings.
pub const TECHNICAL_TERMS: &[&str] = &[
    "algorithm",
    "database",
    "api",
    "framework",
    "library",
    "function",
    "variable",
    "class",
    "object",
    "method",
    "array",
    "string",
    "integer",
    "boolean",
    "loop",
    "condition",
    "recursion",
    "debugging",
    "testing",
    "deployment",
    "server",
    "client",
    "frontend",
    "backend",
    "fullstack",
    "devops",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "machine learning",
    "artificial intelligence",
    "neural network",
    "deep learning",
    "data science",
    "analytics",
    "visualization",
];

/// Programming language names, matched like [`TECHNICAL_TERMS`].
pub const PROGRAMMING_LANGUAGES: &[&str] = &[
    "python",
    "javascript",
    "java",
    "c++",
    "c#",
    "php",
    "ruby",
    "go",
    "rust",
    "swift",
    "kotlin",
    "typescript",
    "html",
    "css",
    "sql",
    "r",
    "matlab",
    "scala",
    "perl",
    "bash",
    "powershell",
];

/// Topic keywords; a message counts once per keyword it mentions.
pub const TOPIC_KEYWORDS: &[&str] = &[
    "python",
    "javascript",
    "react",
    "node",
    "api",
    "database",
    "sql",
    "html",
    "css",
    "git",
    "github",
    "docker",
    "kubernetes",
    "aws",
    "machine learning",
    "ai",
    "neural",
    "algorithm",
    "data",
    "frontend",
    "backend",
    "fullstack",
    "devops",
    "deployment",
];

/// Keyword literals that count as code under [`CodeDetection::Keywords`].
const CODE_KEYWORDS: &[&str] = &["def ", "function "];

const CODE_FENCE: &str = "```";

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\(\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+")
        .expect("URL pattern is a valid regex")
});

/// English and Spanish function words excluded from word frequency.
static STOPWORDS: phf::Set<&'static str> = phf_set! {
    // English
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can",
    "had", "her", "was", "one", "our", "out", "has", "him", "his", "how",
    "its", "who", "did", "yes", "she", "too", "own", "off", "why", "nor",
    "few", "now", "than", "that", "this", "with", "have", "from", "they",
    "will", "would", "there", "their", "what", "about", "which", "when",
    "make", "your", "just", "into", "them", "some", "could", "other",
    "then", "these", "those", "were", "been", "being", "does", "doing",
    "each", "more", "most", "only", "over", "same", "should", "such",
    "very", "while", "where", "here", "after", "before", "again", "below",
    "above", "under", "until", "because", "between", "through", "during",
    "against", "further", "once", "both", "itself", "myself", "yourself",
    "yourselves", "himself", "herself", "ourselves", "themselves", "theirs",
    "ours", "yours", "hers", "whom", "also", "don", "doesn",
    "didn", "isn", "aren", "wasn", "weren", "hasn", "haven", "hadn",
    "won", "wouldn", "shouldn", "couldn", "mustn", "needn", "shan", "mightn",
    // Spanish
    "que", "los", "del", "las", "por", "con", "una", "para", "como", "más",
    "pero", "sus", "le", "ya", "porque", "esta", "entre", "cuando", "muy",
    "sin", "sobre", "también", "hasta", "hay", "donde", "quien", "desde",
    "todo", "nos", "durante", "todos", "uno", "les", "contra", "otros",
    "ese", "eso", "ante", "ellos", "esto", "mí", "antes", "algunos", "qué",
    "unos", "otro", "otras", "otra", "él", "tanto", "esa", "estos", "mucho",
    "quienes", "nada", "muchos", "cual", "poco", "ella", "estar", "estas",
    "algunas", "algo", "nosotros", "mis", "tú", "te", "ti", "tu", "tus",
    "ellas", "nosotras", "vosotros", "vosotras", "os", "mío", "mía", "míos",
    "mías", "tuyo", "tuya", "tuyos", "tuyas", "suyo", "suya", "suyos",
    "suyas", "nuestro", "nuestra", "nuestros", "nuestras", "vuestro",
    "vuestra", "vuestros", "vuestras", "esos", "esas", "estoy", "estás",
    "está", "estamos", "estáis", "están", "ser", "soy", "eres", "somos",
    "son", "era", "eras", "éramos", "eran", "fue", "fueron", "sea", "sean",
    "tengo", "tienes", "tiene", "tenemos", "tienen", "hemos", "han", "haber",
    "había", "fui", "sido", "ha", "he", "cómo", "sí", "este",
    "aquí", "así", "pues", "solo", "sólo", "cada", "ahora", "bien",
};

/// Sentiment class derived from a polarity with fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentClass {
    Positive,
    Neutral,
    Negative,
}

impl SentimentClass {
    /// Classifies a polarity. Both thresholds are exclusive: `0.1` and
    /// `-0.1` are neutral.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > POSITIVE_THRESHOLD {
            SentimentClass::Positive
        } else if polarity < NEGATIVE_THRESHOLD {
            SentimentClass::Negative
        } else {
            SentimentClass::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentClass::Positive => "positive",
            SentimentClass::Neutral => "neutral",
            SentimentClass::Negative => "negative",
        }
    }
}

/// How code is detected in a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeDetection {
    /// A triple-backtick fence only
    #[default]
    Fence,
    /// A fence or common keyword literals (`def `, `function `)
    Keywords,
}

impl CodeDetection {
    /// Returns `true` if `text` contains code under this policy.
    pub fn detect(&self, text: &str) -> bool {
        if text.contains(CODE_FENCE) {
            return true;
        }
        match self {
            CodeDetection::Fence => false,
            CodeDetection::Keywords => CODE_KEYWORDS.iter().any(|kw| text.contains(kw)),
        }
    }
}

impl std::str::FromStr for CodeDetection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fence" => Ok(CodeDetection::Fence),
            "keywords" | "strict" => Ok(CodeDetection::Keywords),
            _ => Err(format!(
                "Unknown code detection: '{}'. Expected one of: fence, keywords",
                s
            )),
        }
    }
}

/// Binary language guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "español")]
    Spanish,
    #[serde(rename = "inglés")]
    English,
}

impl Language {
    /// Spanish if the text has any accented vowel, `ñ` or `ü`; else English.
    pub fn guess(text: &str) -> Self {
        let spanish = text
            .chars()
            .flat_map(char::to_lowercase)
            .any(|c| matches!(c, 'á' | 'é' | 'í' | 'ó' | 'ú' | 'ñ' | 'ü'));
        if spanish {
            Language::Spanish
        } else {
            Language::English
        }
    }

    /// Key used in the statistics document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Spanish => "español",
            Language::English => "inglés",
        }
    }
}

/// Conversational courtesy patterns, each triggered by a small bilingual
/// phrase set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionPattern {
    #[serde(rename = "gratitud")]
    Gratitude,
    #[serde(rename = "cortesía")]
    Courtesy,
    #[serde(rename = "explicación")]
    Explanation,
    #[serde(rename = "ayuda")]
    HelpRequest,
}

impl InteractionPattern {
    pub fn all() -> &'static [InteractionPattern] {
        &[
            InteractionPattern::Gratitude,
            InteractionPattern::Courtesy,
            InteractionPattern::Explanation,
            InteractionPattern::HelpRequest,
        ]
    }

    /// Lowercase phrases that trigger this pattern.
    pub fn phrases(&self) -> &'static [&'static str] {
        match self {
            InteractionPattern::Gratitude => &["gracias", "thank you"],
            InteractionPattern::Courtesy => &["por favor", "please"],
            InteractionPattern::Explanation => &["explica", "explain"],
            InteractionPattern::HelpRequest => &["ayuda", "help"],
        }
    }

    /// Key used in the statistics document.
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionPattern::Gratitude => "gratitud",
            InteractionPattern::Courtesy => "cortesía",
            InteractionPattern::Explanation => "explicación",
            InteractionPattern::HelpRequest => "ayuda",
        }
    }
}

/// Features extracted from one text unit.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFeatures {
    /// Whitespace-separated word count
    pub word_count: u64,
    /// Character (code point) count
    pub char_count: u64,
    /// Polarity in `[-1.0, 1.0]`
    pub polarity: f64,
    pub sentiment: SentimentClass,
    /// Technical terms with their occurrence counts
    pub technical_terms: Vec<(&'static str, u64)>,
    /// Programming languages with their occurrence counts
    pub programming_languages: Vec<(&'static str, u64)>,
    /// Topic keywords mentioned at least once
    pub topics: Vec<&'static str>,
    pub interaction_patterns: Vec<InteractionPattern>,
    /// Text ends with `?`
    pub is_question: bool,
    pub has_code: bool,
    pub url_count: u64,
    /// Every emoji occurrence, in order
    pub emojis: Vec<char>,
    pub language: Language,
    /// Lowercased content words for the word-frequency table
    pub words: Vec<String>,
}

/// Extracts [`TextFeatures`] using an injected sentiment scorer.
pub struct TextAnalyzer {
    scorer: Box<dyn SentimentScorer>,
    code_detection: CodeDetection,
}

impl std::fmt::Debug for TextAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextAnalyzer")
            .field("scorer", &self.scorer.name())
            .field("code_detection", &self.code_detection)
            .finish()
    }
}

impl TextAnalyzer {
    pub fn new(scorer: Box<dyn SentimentScorer>, code_detection: CodeDetection) -> Self {
        Self {
            scorer,
            code_detection,
        }
    }

    /// Name of the sentiment backend in use.
    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    /// Scores `text`, falling back to `0.0` for blank text or a backend error.
    pub fn polarity(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        match self.scorer.polarity(text) {
            Ok(p) if p.is_finite() => p.clamp(-1.0, 1.0),
            Ok(p) => {
                tracing::debug!(polarity = p, "non-finite polarity, scoring as neutral");
                0.0
            }
            Err(e) => {
                tracing::debug!(error = %e, backend = self.scorer.name(), "sentiment scoring failed");
                0.0
            }
        }
    }

    /// Extracts every feature of `text`.
    pub fn analyze(&self, text: &str) -> TextFeatures {
        let lower = text.to_lowercase();
        let polarity = self.polarity(text);

        TextFeatures {
            word_count: text.split_whitespace().count() as u64,
            char_count: text.chars().count() as u64,
            polarity,
            sentiment: SentimentClass::from_polarity(polarity),
            technical_terms: count_occurrences(&lower, TECHNICAL_TERMS),
            programming_languages: count_occurrences(&lower, PROGRAMMING_LANGUAGES),
            topics: TOPIC_KEYWORDS
                .iter()
                .copied()
                .filter(|kw| lower.contains(kw))
                .collect(),
            interaction_patterns: InteractionPattern::all()
                .iter()
                .copied()
                .filter(|p| p.phrases().iter().any(|phrase| lower.contains(phrase)))
                .collect(),
            is_question: text.trim_end().ends_with('?'),
            has_code: self.code_detection.detect(text),
            url_count: URL_REGEX.find_iter(text).count() as u64,
            emojis: text.chars().filter(|c| is_emoji(*c)).collect(),
            language: Language::guess(text),
            words: content_words(&lower),
        }
    }
}

/// Counts non-overlapping occurrences of each vocabulary entry in `lower`.
fn count_occurrences(lower: &str, vocabulary: &[&'static str]) -> Vec<(&'static str, u64)> {
    vocabulary
        .iter()
        .filter_map(|term| {
            let n = lower.matches(term).count() as u64;
            (n > 0).then_some((*term, n))
        })
        .collect()
}

/// Returns `true` for code points in the emoticon, pictograph, transport
/// and regional-indicator blocks.
pub fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F600..=0x1F64F | 0x1F300..=0x1F5FF | 0x1F680..=0x1F6FF | 0x1F1E0..=0x1F1FF
    )
}

/// Splits lowercased text into words for the frequency table.
///
/// Non-word characters are stripped; a word is kept when it is purely
/// alphabetic, longer than two characters and not a stopword.
pub fn content_words(lower: &str) -> Vec<String> {
    lower
        .split_whitespace()
        .filter_map(|raw| {
            let clean: String = raw.chars().filter(|c| c.is_alphanumeric() || *c == '_').collect();
            let keep = clean.chars().count() > 2
                && clean.chars().all(char::is_alphabetic)
                && !STOPWORDS.contains(clean.as_str());
            keep.then_some(clean)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sentiment::{LexiconScorer, NeutralScorer};
    use crate::error::{ChatpulseError, Result};

    struct FailingScorer;

    impl SentimentScorer for FailingScorer {
        fn name(&self) -> &'static str {
            "Failing"
        }

        fn polarity(&self, _text: &str) -> Result<f64> {
            Err(ChatpulseError::sentiment("backend offline"))
        }
    }

    struct FixedScorer(f64);

    impl SentimentScorer for FixedScorer {
        fn name(&self) -> &'static str {
            "Fixed"
        }

        fn polarity(&self, _text: &str) -> Result<f64> {
            Ok(self.0)
        }
    }

    fn lexicon() -> TextAnalyzer {
        TextAnalyzer::new(Box::new(LexiconScorer::new()), CodeDetection::Fence)
    }

    #[test]
    fn test_sentiment_class_boundaries() {
        assert_eq!(SentimentClass::from_polarity(0.1), SentimentClass::Neutral);
        assert_eq!(SentimentClass::from_polarity(-0.1), SentimentClass::Neutral);
        assert_eq!(SentimentClass::from_polarity(0.11), SentimentClass::Positive);
        assert_eq!(SentimentClass::from_polarity(-0.11), SentimentClass::Negative);
        assert_eq!(SentimentClass::from_polarity(0.0), SentimentClass::Neutral);
    }

    #[test]
    fn test_failing_scorer_is_neutral() {
        let analyzer = TextAnalyzer::new(Box::new(FailingScorer), CodeDetection::Fence);
        let features = analyzer.analyze("I love this");
        assert_eq!(features.polarity, 0.0);
        assert_eq!(features.sentiment, SentimentClass::Neutral);
    }

    #[test]
    fn test_blank_text_is_not_scored() {
        let analyzer = TextAnalyzer::new(Box::new(FixedScorer(0.9)), CodeDetection::Fence);
        assert_eq!(analyzer.polarity("   \n"), 0.0);
        assert_eq!(analyzer.polarity("hi"), 0.9);
    }

    #[test]
    fn test_fixed_scorer_boundary_classification() {
        let analyzer = TextAnalyzer::new(Box::new(FixedScorer(0.1)), CodeDetection::Fence);
        assert_eq!(analyzer.analyze("x").sentiment, SentimentClass::Neutral);
        let analyzer = TextAnalyzer::new(Box::new(FixedScorer(-0.11)), CodeDetection::Fence);
        assert_eq!(analyzer.analyze("x").sentiment, SentimentClass::Negative);
    }

    #[test]
    fn test_counts() {
        let features = lexicon().analyze("héllo  wide world");
        assert_eq!(features.word_count, 3);
        assert_eq!(features.char_count, 17);
    }

    #[test]
    fn test_technical_terms_per_occurrence() {
        let features = lexicon().analyze("The API calls another API through a Docker server");
        assert!(features.technical_terms.contains(&("api", 2)));
        assert!(features.technical_terms.contains(&("docker", 1)));
        assert!(features.technical_terms.contains(&("server", 1)));
    }

    #[test]
    fn test_programming_languages_substring_policy() {
        let features = lexicon().analyze("javascript");
        let langs: Vec<_> = features.programming_languages.iter().map(|(l, _)| *l).collect();
        assert!(langs.contains(&"javascript"));
        assert!(langs.contains(&"java"));
        assert!(langs.contains(&"r"));
    }

    #[test]
    fn test_interaction_patterns() {
        let features = lexicon().analyze("Por favor, explica esto. Thank you!");
        assert!(features.interaction_patterns.contains(&InteractionPattern::Courtesy));
        assert!(features.interaction_patterns.contains(&InteractionPattern::Explanation));
        assert!(features.interaction_patterns.contains(&InteractionPattern::Gratitude));
        assert!(!features.interaction_patterns.contains(&InteractionPattern::HelpRequest));
    }

    #[test]
    fn test_question_flag() {
        assert!(lexicon().analyze("Is this right?  ").is_question);
        assert!(!lexicon().analyze("Why? Because.").is_question);
    }

    #[test]
    fn test_code_detection_policies() {
        let fence = lexicon();
        let strict = TextAnalyzer::new(Box::new(NeutralScorer), CodeDetection::Keywords);
        assert!(fence.analyze("```rust\nfn main() {}\n```").has_code);
        assert!(!fence.analyze("def main(): pass").has_code);
        assert!(strict.analyze("def main(): pass").has_code);
        assert!(strict.analyze("function go() {}").has_code);
        assert!(!strict.analyze("plain prose").has_code);
    }

    #[test]
    fn test_url_count() {
        let features = lexicon().analyze("See https://a.example/x and http://b.example?q=1 now");
        assert_eq!(features.url_count, 2);
        assert_eq!(lexicon().analyze("no links, just http talk").url_count, 0);
    }

    #[test]
    fn test_emoji_occurrences() {
        let features = lexicon().analyze("nice 😀😀 🚀 ✓");
        assert_eq!(features.emojis, vec!['😀', '😀', '🚀']);
    }

    #[test]
    fn test_language_guess() {
        assert_eq!(Language::guess("¿Qué tal, señor?"), Language::Spanish);
        assert_eq!(Language::guess("ÁRBOL"), Language::Spanish);
        assert_eq!(Language::guess("hola amigo"), Language::English);
    }

    #[test]
    fn test_content_words_filtering() {
        let words = content_words("the rust compiler, rust's borrow-checker and 2024 ok");
        assert_eq!(words, vec!["rust", "compiler", "rusts", "borrowchecker"]);
    }

    #[test]
    fn test_topics_once_per_message() {
        let features = lexicon().analyze("python python python");
        assert_eq!(features.topics, vec!["python"]);
    }

    #[test]
    fn test_serde_keys() {
        assert_eq!(serde_json::to_string(&Language::Spanish).unwrap(), "\"español\"");
        assert_eq!(
            serde_json::to_string(&InteractionPattern::Courtesy).unwrap(),
            "\"cortesía\""
        );
        assert_eq!(serde_json::to_string(&SentimentClass::Positive).unwrap(), "\"positive\"");
    }
}
