//! Raw aggregate state built during the walk.
//!
//! An [`Accumulator`] is owned by one analysis run. The walker folds every
//! message and conversation into it; the reducer then turns it into a
//! [`StatsReport`](super::report::StatsReport). Accumulators built over
//! disjoint, consecutive slices of the record set can be combined with
//! [`Accumulator::merge`]: counters add, sequences concatenate in slice order
//! and extremes use min/max, so the result does not depend on how the
//! record set was partitioned.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use super::counter::FrequencyCounter;
use super::report::ComplexityRecord;
use super::temporal::TemporalBuckets;
use super::text::{SentimentClass, TextFeatures};
use crate::record::Role;

/// Key under which questions are counted in `question_patterns`.
pub const QUESTION_KEY: &str = "preguntas";

/// Aggregate counters, frequency tables and sequences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accumulator {
    pub total_conversations: u64,
    pub total_messages: u64,
    pub total_words: u64,
    pub total_characters: u64,
    pub message_types: FrequencyCounter,

    pub positive_messages: u64,
    pub negative_messages: u64,
    pub neutral_messages: u64,
    pub sentiment_scores: Vec<f64>,

    pub code_blocks: u64,
    pub urls_shared: u64,

    pub word_frequency: FrequencyCounter,
    pub topics: FrequencyCounter,
    pub technical_terms: FrequencyCounter,
    pub programming_languages: FrequencyCounter,
    pub emojis: FrequencyCounter,
    pub languages: FrequencyCounter,
    pub interaction_patterns: FrequencyCounter,
    pub question_patterns: FrequencyCounter,

    pub conversation_lengths: Vec<u64>,
    pub conversation_titles: Vec<String>,
    pub complexity: Vec<ComplexityRecord>,
    pub longest_conversation: u64,
    /// `None` until a conversation is recorded
    pub shortest_conversation: Option<u64>,
    pub longest_message: u64,
    /// `None` until a message is recorded
    pub shortest_message: Option<u64>,

    pub temporal: TemporalBuckets,
    /// Datetimes of dated conversations, in record order
    pub conversation_times: Vec<NaiveDateTime>,
    pub daily_messages: BTreeMap<NaiveDate, u64>,
    pub daily_words: BTreeMap<NaiveDate, u64>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one analyzed message into the global counters.
    pub fn record_message(&mut self, role: Role, features: &TextFeatures) {
        self.total_messages += 1;
        self.total_words += features.word_count;
        self.total_characters += features.char_count;
        self.message_types.add(role.as_str());

        self.longest_message = self.longest_message.max(features.char_count);
        self.shortest_message = Some(
            self.shortest_message
                .map_or(features.char_count, |s| s.min(features.char_count)),
        );

        self.sentiment_scores.push(features.polarity);
        match features.sentiment {
            SentimentClass::Positive => self.positive_messages += 1,
            SentimentClass::Negative => self.negative_messages += 1,
            SentimentClass::Neutral => self.neutral_messages += 1,
        }

        if features.has_code {
            self.code_blocks += 1;
        }
        self.urls_shared += features.url_count;

        for word in &features.words {
            self.word_frequency.add(word);
        }
        for topic in &features.topics {
            self.topics.add(topic);
        }
        for (term, n) in &features.technical_terms {
            self.technical_terms.add_n(term, *n);
        }
        for (lang, n) in &features.programming_languages {
            self.programming_languages.add_n(lang, *n);
        }
        let mut buf = [0u8; 4];
        for emoji in &features.emojis {
            self.emojis.add(emoji.encode_utf8(&mut buf));
        }
        self.languages.add(features.language.as_str());
        for pattern in &features.interaction_patterns {
            self.interaction_patterns.add(pattern.as_str());
        }
        if features.is_question {
            self.question_patterns.add(QUESTION_KEY);
        }
    }

    /// Counts a conversation at `dt` in every temporal bucket.
    pub fn record_time(&mut self, dt: NaiveDateTime) {
        self.temporal.record(dt);
        self.conversation_times.push(dt);
    }

    /// Records the rollup of a finished conversation.
    ///
    /// `date` attributes its messages and words to a calendar day.
    pub fn record_conversation(
        &mut self,
        title: &str,
        date: Option<NaiveDate>,
        rollup: &ConversationRollup,
    ) {
        self.total_conversations += 1;
        self.conversation_lengths.push(rollup.message_count);
        self.conversation_titles.push(title.to_string());

        self.longest_conversation = self.longest_conversation.max(rollup.message_count);
        self.shortest_conversation = Some(
            self.shortest_conversation
                .map_or(rollup.message_count, |s| s.min(rollup.message_count)),
        );

        if let Some(date) = date {
            *self.daily_messages.entry(date).or_default() += rollup.message_count;
            *self.daily_words.entry(date).or_default() += rollup.word_count;
        }

        if let Some(record) = rollup.complexity(title) {
            self.complexity.push(record);
        }
    }

    /// Combines `other`, which covers records after those of `self`.
    pub fn merge(&mut self, other: Accumulator) {
        self.total_conversations += other.total_conversations;
        self.total_messages += other.total_messages;
        self.total_words += other.total_words;
        self.total_characters += other.total_characters;
        self.message_types.merge(&other.message_types);

        self.positive_messages += other.positive_messages;
        self.negative_messages += other.negative_messages;
        self.neutral_messages += other.neutral_messages;
        self.sentiment_scores.extend(other.sentiment_scores);

        self.code_blocks += other.code_blocks;
        self.urls_shared += other.urls_shared;

        self.word_frequency.merge(&other.word_frequency);
        self.topics.merge(&other.topics);
        self.technical_terms.merge(&other.technical_terms);
        self.programming_languages.merge(&other.programming_languages);
        self.emojis.merge(&other.emojis);
        self.languages.merge(&other.languages);
        self.interaction_patterns.merge(&other.interaction_patterns);
        self.question_patterns.merge(&other.question_patterns);

        self.conversation_lengths.extend(other.conversation_lengths);
        self.conversation_titles.extend(other.conversation_titles);
        self.complexity.extend(other.complexity);
        self.longest_conversation = self.longest_conversation.max(other.longest_conversation);
        self.shortest_conversation = min_option(self.shortest_conversation, other.shortest_conversation);
        self.longest_message = self.longest_message.max(other.longest_message);
        self.shortest_message = min_option(self.shortest_message, other.shortest_message);

        self.temporal.merge(&other.temporal);
        self.conversation_times.extend(other.conversation_times);
        for (date, n) in other.daily_messages {
            *self.daily_messages.entry(date).or_default() += n;
        }
        for (date, n) in other.daily_words {
            *self.daily_words.entry(date).or_default() += n;
        }
    }
}

fn min_option(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Conversation-local totals, folded message by message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationRollup {
    pub message_count: u64,
    pub word_count: u64,
    pub char_count: u64,
    pub sentiment_sum: f64,
}

impl ConversationRollup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, features: &TextFeatures) {
        self.message_count += 1;
        self.word_count += features.word_count;
        self.char_count += features.char_count;
        self.sentiment_sum += features.polarity;
    }

    /// Returns the complexity record, or `None` when no message was
    /// observed.
    pub fn complexity(&self, title: &str) -> Option<ComplexityRecord> {
        if self.message_count == 0 {
            return None;
        }
        let n = self.message_count as f64;
        let sentiment = self.sentiment_sum / n;
        Some(ComplexityRecord {
            title: title.to_string(),
            sentiment,
            message_count: self.message_count,
            word_count: self.word_count,
            avg_message_length: self.char_count as f64 / n,
            sentiment_category: SentimentClass::from_polarity(sentiment),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sentiment::LexiconScorer;
    use crate::core::text::{CodeDetection, TextAnalyzer};

    fn features(text: &str) -> TextFeatures {
        TextAnalyzer::new(Box::new(LexiconScorer::new()), CodeDetection::Fence).analyze(text)
    }

    fn conversation(texts: &[&str]) -> Accumulator {
        let mut acc = Accumulator::new();
        let mut rollup = ConversationRollup::new();
        for text in texts {
            let f = features(text);
            acc.record_message(Role::User, &f);
            rollup.observe(&f);
        }
        acc.record_conversation("t", None, &rollup);
        acc
    }

    #[test]
    fn test_record_message_updates_counters() {
        let mut acc = Accumulator::new();
        acc.record_message(Role::User, &features("Thank you! 😀 https://x.io ```code```"));

        assert_eq!(acc.total_messages, 1);
        assert_eq!(acc.message_types.get("user"), 1);
        assert_eq!(acc.interaction_patterns.get("gratitud"), 1);
        assert_eq!(acc.emojis.get("😀"), 1);
        assert_eq!(acc.urls_shared, 1);
        assert_eq!(acc.code_blocks, 1);
        assert_eq!(acc.languages.get("inglés"), 1);
        assert_eq!(acc.sentiment_scores.len(), 1);
    }

    #[test]
    fn test_question_key() {
        let mut acc = Accumulator::new();
        acc.record_message(Role::User, &features("why?"));
        assert_eq!(acc.question_patterns.get(QUESTION_KEY), 1);
    }

    #[test]
    fn test_empty_conversation_has_no_complexity() {
        let acc = conversation(&[]);
        assert_eq!(acc.total_conversations, 1);
        assert_eq!(acc.shortest_conversation, Some(0));
        assert!(acc.complexity.is_empty());
    }

    #[test]
    fn test_complexity_record() {
        let acc = conversation(&["great work", "terrible bug"]);
        let record = &acc.complexity[0];
        assert_eq!(record.message_count, 2);
        assert_eq!(record.word_count, 4);
        assert_eq!(record.avg_message_length, 11.0);
        assert!((record.sentiment - (-0.1)).abs() < 1e-9);
        assert_eq!(record.sentiment_category, SentimentClass::Neutral);
    }

    #[test]
    fn test_extremes() {
        let mut acc = conversation(&["a", "abcdef"]);
        acc.merge(conversation(&["abc"]));
        assert_eq!(acc.longest_message, 6);
        assert_eq!(acc.shortest_message, Some(1));
        assert_eq!(acc.longest_conversation, 2);
        assert_eq!(acc.shortest_conversation, Some(1));
    }

    #[test]
    fn test_merge_matches_sequential_fold() {
        let a = conversation(&["python rocks", "explain rust please?"]);
        let b = conversation(&["docker and kubernetes 🚀"]);
        let c = conversation(&[]);

        let mut left = a.clone();
        left.merge(b.clone());
        left.merge(c.clone());

        let mut bc = b;
        bc.merge(c);
        let mut right = a;
        right.merge(bc);

        assert_eq!(left, right);
        assert_eq!(left.total_conversations, 3);
        assert_eq!(left.conversation_lengths, vec![2, 1, 0]);
    }

    #[test]
    fn test_merge_with_empty_is_identity() {
        let a = conversation(&["hello world"]);
        let mut merged = a.clone();
        merged.merge(Accumulator::new());
        assert_eq!(merged, a);

        let mut empty = Accumulator::new();
        empty.merge(a.clone());
        assert_eq!(empty, a);
    }
}
