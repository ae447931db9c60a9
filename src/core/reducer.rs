//! Post-pass computation of derived statistics.
//!
//! [`finalize`] consumes an [`Accumulator`] and produces the
//! [`StatsReport`]. Everything here needs the whole dataset: averages,
//! extremes, per-day rates, peak months and correlations. Every derived
//! value has a neutral result (`0`, `None` or an empty list) for inputs
//! where it is undefined; nothing in this module can fail.

use std::collections::BTreeMap;

use super::accumulator::Accumulator;
use super::calendar::{analyze_days, github_style_data};
use super::report::{CorrelationData, PeakPeriod, StatsReport};
use super::series::{cumulative_data, timeline_data};
use super::temporal::weekday_name;
use crate::config::AnalysisConfig;

/// Turns the raw accumulator into the final statistics document.
pub fn finalize(acc: Accumulator, config: &AnalysisConfig) -> StatsReport {
    let first = acc.conversation_times.iter().min().copied();
    let last = acc.conversation_times.iter().max().copied();

    // Floor of whole days between the earliest and latest conversation.
    let span_days = match (first, last) {
        (Some(first), Some(last)) => (last - first).num_days(),
        _ => 0,
    };
    let per_day = |total: u64| {
        if span_days > 0 {
            total as f64 / span_days as f64
        } else {
            0.0
        }
    };

    let temporal = &acc.temporal;
    let days_analysis = match (first, last) {
        (Some(first), Some(last)) => Some(analyze_days(&temporal.daily, first.date(), last.date())),
        _ => None,
    };

    let correlation_data = CorrelationData {
        message_length_sentiment: pearson(
            &acc.complexity.iter().map(|c| c.avg_message_length).collect::<Vec<_>>(),
            &acc.complexity.iter().map(|c| c.sentiment).collect::<Vec<_>>(),
        ),
        messages_words: pearson(
            &acc.complexity.iter().map(|c| c.message_count as f64).collect::<Vec<_>>(),
            &acc.complexity.iter().map(|c| c.word_count as f64).collect::<Vec<_>>(),
        ),
    };

    StatsReport {
        total_conversations: acc.total_conversations,
        total_messages: acc.total_messages,
        total_words: acc.total_words,
        total_characters: acc.total_characters,
        message_types: acc.message_types.top_n(usize::MAX),

        daily_activity: temporal.daily.clone(),
        hourly_activity: temporal.hourly.clone(),
        monthly_activity: temporal.monthly.clone(),
        weekly_activity: temporal.weekly.clone(),
        weekday_activity: temporal
            .weekday
            .iter()
            .map(|(day, count)| (weekday_name(*day).to_string(), *count))
            .collect(),
        yearly_activity: temporal.yearly.clone(),
        heatmap_data: temporal.heatmap.clone(),

        word_frequency: acc.word_frequency.top_n(config.top_words),
        topics: acc.topics.top_n(config.top_topics),
        technical_terms: acc.technical_terms.top_n(config.top_technical_terms),
        programming_languages: acc.programming_languages.top_n(config.top_programming_languages),
        emojis_used: acc.emojis.top_n(config.top_emojis),
        languages: acc.languages.top_n(usize::MAX),
        interaction_patterns: acc.interaction_patterns.top_n(usize::MAX),
        question_patterns: acc.question_patterns.top_n(usize::MAX),

        positive_messages: acc.positive_messages,
        negative_messages: acc.negative_messages,
        neutral_messages: acc.neutral_messages,
        avg_sentiment: mean(&acc.sentiment_scores),
        sentiment_std: sample_std(&acc.sentiment_scores),
        sentiment_scores: acc.sentiment_scores,

        code_blocks: acc.code_blocks,
        urls_shared: acc.urls_shared,

        longest_conversation: acc.longest_conversation,
        shortest_conversation: acc.shortest_conversation.unwrap_or(0),
        avg_conversation_length: ratio(
            acc.conversation_lengths.iter().sum(),
            acc.conversation_lengths.len() as u64,
        ),
        longest_message: acc.longest_message,
        shortest_message: acc.shortest_message.unwrap_or(0),
        avg_message_length: ratio(acc.total_characters, acc.total_messages),
        avg_words_per_message: ratio(acc.total_words, acc.total_messages),
        conversation_lengths: acc.conversation_lengths,
        conversation_titles: acc.conversation_titles,
        conversation_complexity: acc.complexity,

        first_conversation: first.map(|dt| dt.date()),
        last_conversation: last.map(|dt| dt.date()),
        most_active_day: ordered_max(&temporal.daily, &temporal.day_order),
        most_active_hour: ordered_max(&temporal.hourly, &temporal.hour_order),
        most_active_month: ordered_max(&temporal.monthly, &temporal.month_order),
        conversations_per_day: per_day(acc.total_conversations),
        messages_per_day: per_day(acc.total_messages),
        words_per_day: per_day(acc.total_words),
        peak_usage_periods: peak_periods(&temporal.monthly, config.peak_multiplier),
        usage_trends: temporal
            .monthly
            .iter()
            .map(|(month, count)| (month.clone(), *count))
            .collect(),
        conversation_gaps: acc
            .conversation_times
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).num_milliseconds() as f64 / 3_600_000.0)
            .collect(),
        correlation_data,

        github_style_data: github_style_data(&temporal.daily, config.anniversary.as_ref()),
        timeline_data: timeline_data(&temporal.daily),
        cumulative_data: cumulative_data(&temporal.daily, &acc.daily_messages, &acc.daily_words),
        days_analysis,

        user_profile: None,
    }
}

/// Returns the key with the largest count, visiting keys in `order`; the
/// first key reaching the maximum wins ties. Keys missing from `counts` are
/// skipped.
pub fn ordered_max<'a, K>(
    counts: &BTreeMap<K, u64>,
    order: impl IntoIterator<Item = &'a K>,
) -> Option<K>
where
    K: Ord + Clone + 'a,
{
    let mut best: Option<(&K, u64)> = None;
    for key in order {
        let Some(count) = counts.get(key) else {
            continue;
        };
        if best.is_none_or(|(_, top)| *count > top) {
            best = Some((key, *count));
        }
    }
    best.map(|(key, _)| key.clone())
}

/// Months whose count exceeds `multiplier` times the mean monthly count.
pub fn peak_periods(monthly: &BTreeMap<String, u64>, multiplier: f64) -> Vec<PeakPeriod> {
    if monthly.is_empty() {
        return Vec::new();
    }
    let avg = monthly.values().sum::<u64>() as f64 / monthly.len() as f64;
    let threshold = avg * multiplier;

    monthly
        .iter()
        .filter(|(_, count)| **count as f64 > threshold)
        .map(|(month, count)| PeakPeriod {
            month: month.clone(),
            count: *count,
            intensity: *count as f64 / avg,
        })
        .collect()
}

/// Pearson correlation coefficient of two equal-length samples.
///
/// Returns `0.0` when it is undefined: fewer than two points, mismatched
/// lengths, zero variance in either sample, or a non-finite result.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() < 2 || xs.len() != ys.len() {
        return 0.0;
    }
    let mx = mean(xs);
    let my = mean(ys);

    let (mut cov, mut vx, mut vy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }

    if vx == 0.0 || vy == 0.0 {
        return 0.0;
    }
    let r = cov / (vx.sqrt() * vy.sqrt());
    if r.is_finite() { r.clamp(-1.0, 1.0) } else { 0.0 }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pearson_perfect() {
        assert!((pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate_is_zero() {
        assert_eq!(pearson(&[], &[]), 0.0);
        assert_eq!(pearson(&[1.0], &[2.0]), 0.0);
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(pearson(&[1.0, f64::NAN], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_ordered_max_first_wins_ties() {
        let map = BTreeMap::from([("2024-01".to_string(), 3), ("2024-02".to_string(), 5), ("2024-03".to_string(), 5)]);
        assert_eq!(ordered_max(&map, map.keys()), Some("2024-02".to_string()));
        assert_eq!(ordered_max(&BTreeMap::<u32, u64>::new(), &[]), None);
    }

    #[test]
    fn test_ordered_max_follows_arrival_not_key_order() {
        let hours = BTreeMap::from([(0, 2), (12, 2), (18, 1)]);
        assert_eq!(ordered_max(&hours, &[18, 12, 0]), Some(12));
        assert_eq!(ordered_max(&hours, &[0, 12, 18]), Some(0));
        // A larger count later in the order still wins
        assert_eq!(ordered_max(&BTreeMap::from([(1, 1), (2, 3)]), &[1, 2]), Some(2));
    }

    #[test]
    fn test_most_active_ties_follow_record_order() {
        use crate::core::temporal::TimeBasis;

        // 2024-03-02 12:00Z comes first in the record set, 2024-03-01 00:00Z second
        let mut acc = Accumulator::new();
        for secs in [1_709_380_800.0, 1_709_251_200.0] {
            acc.record_time(TimeBasis::Utc.to_datetime(secs).unwrap());
        }
        let report = finalize(acc, &AnalysisConfig::default());

        assert_eq!(report.most_active_day.map(|d| d.to_string()).as_deref(), Some("2024-03-02"));
        assert_eq!(report.most_active_hour, Some(12));
        assert_eq!(report.first_conversation.map(|d| d.to_string()).as_deref(), Some("2024-03-01"));
        assert_eq!(report.last_conversation.map(|d| d.to_string()).as_deref(), Some("2024-03-02"));
    }

    #[test]
    fn test_peak_periods() {
        let monthly = BTreeMap::from([
            ("2024-01".to_string(), 1),
            ("2024-02".to_string(), 1),
            ("2024-03".to_string(), 10),
        ]);
        let peaks = peak_periods(&monthly, 1.5);
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].month, "2024-03");
        assert!((peaks[0].intensity - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_peak_periods_uniform_has_none() {
        let monthly = BTreeMap::from([("2024-01".to_string(), 4), ("2024-02".to_string(), 4)]);
        assert!(peak_periods(&monthly, 1.5).is_empty());
    }

    #[test]
    fn test_sample_std() {
        assert_eq!(sample_std(&[0.5]), 0.0);
        assert!((sample_std(&[1.0, 3.0]) - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_finalize_empty() {
        let report = finalize(Accumulator::new(), &AnalysisConfig::default());
        assert_eq!(report.total_conversations, 0);
        assert_eq!(report.avg_message_length, 0.0);
        assert_eq!(report.avg_words_per_message, 0.0);
        assert_eq!(report.avg_conversation_length, 0.0);
        assert_eq!(report.shortest_conversation, 0);
        assert_eq!(report.shortest_message, 0);
        assert!(report.first_conversation.is_none());
        assert!(report.days_analysis.is_none());
        assert!(report.github_style_data.is_empty());
        assert_eq!(report.correlation_data, CorrelationData::default());
    }
}
