//! The conversation walker.
//!
//! [`Analyzer`] makes one forward pass over the record set. For each
//! conversation it resolves the temporal buckets, runs the text analyzer
//! over every message with text, and records the conversation rollup. The
//! resulting [`Accumulator`] is handed to the reducer.
//!
//! # Example
//!
//! ```
//! use chatpulse::config::AnalysisConfig;
//! use chatpulse::core::processor::Analyzer;
//! use chatpulse::core::temporal::TimeBasis;
//! use chatpulse::record::{ChatMessage, Conversation, Role};
//!
//! let conversations = vec![
//!     Conversation::new("Rust help")
//!         .with_create_time(1_700_000_000.0)
//!         .with_message(ChatMessage::new(Role::User, "Can you explain lifetimes?"))
//!         .with_message(ChatMessage::new(Role::Assistant, "Sure! A lifetime is...")),
//!     Conversation::new("Empty"),
//! ];
//!
//! let analyzer = Analyzer::new(AnalysisConfig::new().with_time_basis(TimeBasis::Utc));
//! let report = analyzer.analyze(&conversations);
//!
//! assert_eq!(report.total_conversations, 2);
//! assert_eq!(report.total_messages, 2);
//! assert_eq!(report.shortest_conversation, 0);
//! ```

use std::{panic, thread};

use super::accumulator::{Accumulator, ConversationRollup};
use super::reducer::finalize;
use super::report::StatsReport;
use super::sentiment::{SentimentScorer, create_scorer};
use super::text::TextAnalyzer;
use crate::config::AnalysisConfig;
use crate::progress::{Progress, ProgressCallback};
use crate::record::Conversation;

/// Walks a record set and produces statistics.
pub struct Analyzer {
    config: AnalysisConfig,
    text: TextAnalyzer,
    progress: Option<ProgressCallback>,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("config", &self.config)
            .field("text", &self.text)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl Analyzer {
    /// Creates an analyzer using the sentiment backend named in `config`.
    pub fn new(config: AnalysisConfig) -> Self {
        let scorer = create_scorer(config.sentiment);
        Self::with_scorer(config, scorer)
    }

    /// Creates an analyzer with a caller-provided sentiment scorer.
    pub fn with_scorer(config: AnalysisConfig, scorer: Box<dyn SentimentScorer>) -> Self {
        let text = TextAnalyzer::new(scorer, config.code_detection);
        Self {
            config,
            text,
            progress: None,
        }
    }

    /// Attaches a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Walks and reduces `conversations` into the statistics document.
    pub fn analyze(&self, conversations: &[Conversation]) -> StatsReport {
        let acc = self.walk(conversations);
        let report = finalize(acc, &self.config);
        tracing::info!(
            conversations = report.total_conversations,
            messages = report.total_messages,
            active_days = report.daily_activity.len(),
            "analysis complete"
        );
        report
    }

    /// Folds every conversation, in order, into a fresh accumulator.
    pub fn walk(&self, conversations: &[Conversation]) -> Accumulator {
        let total = conversations.len();
        let interval = self.config.progress_interval.max(1);
        tracing::debug!(total, backend = self.text.scorer_name(), "walking conversations");

        let mut acc = Accumulator::new();
        for (i, conversation) in conversations.iter().enumerate() {
            if i > 0 && i % interval == 0 {
                self.report_progress(i, total);
            }
            self.fold_conversation(&mut acc, conversation);
        }
        self.report_progress(total, total);
        acc
    }

    /// Walks `conversations` split into up to `partitions` consecutive
    /// slices on scoped threads, then merges the partial accumulators in
    /// slice order. The result equals [`walk`](Self::walk).
    ///
    /// Progress is not reported in this mode.
    ///
    /// # Panics
    ///
    /// A panic in any worker is resumed on the calling thread, so no
    /// partition is ever dropped from the result.
    pub fn walk_partitioned(&self, conversations: &[Conversation], partitions: usize) -> Accumulator {
        let partitions = partitions.max(1);
        if partitions == 1 || conversations.len() < 2 {
            return self.walk(conversations);
        }
        let chunk_size = conversations.len().div_ceil(partitions);

        let partials: Vec<Accumulator> = thread::scope(|scope| {
            let handles: Vec<_> = conversations
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        let mut acc = Accumulator::new();
                        for conversation in chunk {
                            self.fold_conversation(&mut acc, conversation);
                        }
                        acc
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| panic::resume_unwind(payload))
                })
                .collect()
        });

        let mut merged = Accumulator::new();
        for partial in partials {
            merged.merge(partial);
        }
        merged
    }

    /// Folds one conversation into `acc`.
    pub fn fold_conversation(&self, acc: &mut Accumulator, conversation: &Conversation) {
        let datetime = conversation.create_time.and_then(|secs| {
            let dt = self.config.time_basis.to_datetime(secs);
            if dt.is_none() {
                tracing::debug!(create_time = secs, "timestamp out of range, no temporal data");
            }
            dt
        });
        if let Some(dt) = datetime {
            acc.record_time(dt);
        }

        let mut rollup = ConversationRollup::new();
        for message in conversation.messages() {
            if !self.config.includes_role(message.role) {
                continue;
            }
            let text = message.text();
            if text.is_empty() {
                continue;
            }
            let features = self.text.analyze(&text);
            acc.record_message(message.role, &features);
            rollup.observe(&features);
        }

        acc.record_conversation(conversation.title(), datetime.map(|dt| dt.date()), &rollup);
    }

    fn report_progress(&self, processed: usize, total: usize) {
        if let Some(callback) = &self.progress {
            callback(Progress::new(processed, Some(total)));
        }
    }
}

/// Analyzes `conversations` with `config`.
pub fn analyze(conversations: &[Conversation], config: &AnalysisConfig) -> StatsReport {
    Analyzer::new(config.clone()).analyze(conversations)
}
