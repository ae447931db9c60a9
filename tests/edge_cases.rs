//! Edge case tests for chatpulse.
//!
//! Tests for unusual inputs: empty exports, missing or bogus timestamps,
//! malformed records, sentiment thresholds and calendar boundaries.

use chatpulse::core::{SentimentClass, TextAnalyzer, create_scorer};
use chatpulse::prelude::*;
use chrono::NaiveDate;

fn utc() -> AnalysisConfig {
    AnalysisConfig::new().with_time_basis(TimeBasis::Utc)
}

fn analyze_json(json: &str) -> StatsReport {
    let conversations = ExportParser::new().parse_str(json).unwrap();
    analyze(&conversations, &utc())
}

// =========================================================================
// Empty input
// =========================================================================

#[test]
fn test_empty_export() {
    let report = analyze_json("[]");

    assert_eq!(report.total_conversations, 0);
    assert_eq!(report.total_messages, 0);
    assert_eq!(report.longest_conversation, 0);
    assert_eq!(report.shortest_conversation, 0);
    assert_eq!(report.avg_conversation_length, 0.0);
    assert_eq!(report.avg_sentiment, 0.0);
    assert_eq!(report.sentiment_std, 0.0);
    assert!(report.daily_activity.is_empty());
    assert!(report.github_style_data.is_empty());
    assert!(report.timeline_data.is_empty());
    assert!(report.cumulative_data.is_empty());
    assert!(report.days_analysis.is_none());
    assert!(report.first_conversation.is_none());
    assert!(report.most_active_day.is_none());
    assert!(report.peak_usage_periods.is_empty());
    assert_eq!(report.conversations_per_day, 0.0);
}

#[test]
fn test_empty_export_serializes() {
    let json = to_json(&analyze_json("[]")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["total_conversations"], 0);
    assert!(value["days_analysis"].is_null());
    assert_eq!(value["github_style_data"], serde_json::json!([]));
}

#[test]
fn test_empty_messages_are_skipped() {
    let json = r#"[{"title": "Blank", "create_time": 1700000000, "mapping": {
        "a": {"message": {"author": {"role": "user"}, "content": {"parts": [""]}}},
        "b": {"message": {"author": {"role": "user"}, "content": {"parts": []}}},
        "c": {"message": {"author": {"role": "user"}, "content": null}}
    }}]"#;
    let report = analyze_json(json);

    assert_eq!(report.total_conversations, 1);
    assert_eq!(report.total_messages, 0);
    assert_eq!(report.conversation_lengths, vec![0]);
    assert!(report.conversation_complexity.is_empty());
}

// =========================================================================
// Timestamps
// =========================================================================

#[test]
fn test_zero_and_missing_timestamps_have_no_temporal_data() {
    let json = r#"[
        {"title": "Zero", "create_time": 0, "mapping": {}},
        {"title": "Null", "create_time": null, "mapping": {}},
        {"title": "Absent", "mapping": {}},
        {"title": "Garbage", "create_time": "yesterday", "mapping": {}},
        {"title": "Negative", "create_time": -5, "mapping": {}}
    ]"#;
    let report = analyze_json(json);

    assert_eq!(report.total_conversations, 5);
    assert!(report.daily_activity.is_empty());
    assert!(report.hourly_activity.is_empty());
    assert!(report.conversation_gaps.is_empty());
    assert!(report.days_analysis.is_none());
}

#[test]
fn test_string_timestamp_is_accepted() {
    let report = analyze_json(r#"[{"title": "S", "create_time": "1700000000.5", "mapping": {}}]"#);
    let day = NaiveDate::from_ymd_opt(2023, 11, 14).unwrap();
    assert_eq!(report.daily_activity.get(&day), Some(&1));
}

#[test]
fn test_undated_conversations_still_count_messages() {
    let conversations = vec![
        Conversation::new("Undated").with_message(ChatMessage::new(Role::User, "hello world")),
    ];
    let report = analyze(&conversations, &utc());

    assert_eq!(report.total_messages, 1);
    assert_eq!(report.total_words, 2);
    assert!(report.cumulative_data.is_empty());
}

#[test]
fn test_midnight_utc_boundary() {
    // 2024-01-01T00:00:00Z and one second earlier
    let conversations = vec![
        Conversation::new("New year").with_create_time(1_704_067_200.0),
        Conversation::new("Old year").with_create_time(1_704_067_199.0),
    ];
    let report = analyze(&conversations, &utc());

    assert_eq!(report.yearly_activity.get(&2023), Some(&1));
    assert_eq!(report.yearly_activity.get(&2024), Some(&1));
    // Both full years are laid out
    assert_eq!(report.github_style_data.len(), 365 + 366);
    assert_eq!(report.conversation_gaps.len(), 1);
    assert!(report.conversation_gaps[0] < 0.0);
}

#[test]
fn test_millisecond_timestamp_has_no_temporal_data() {
    let json = r#"[
        {"title": "Normal", "create_time": 1700000000, "mapping": {}},
        {"title": "Millis", "create_time": 1700000000000, "mapping": {}}
    ]"#;
    let report = analyze_json(json);

    assert_eq!(report.total_conversations, 2);
    assert_eq!(report.daily_activity.values().sum::<u64>(), 1);
    assert_eq!(report.yearly_activity.keys().copied().collect::<Vec<_>>(), vec![2023]);
    // One calendar year, not every year up to the bogus one
    assert_eq!(report.github_style_data.len(), 365);
    assert_eq!(report.days_analysis.unwrap().total_days, 1);
}

#[test]
fn test_built_conversation_past_year_9999_is_undated() {
    let conversations = vec![Conversation::new("Far").with_create_time(1_700_000_000_000.0)];
    let report = analyze(&conversations, &utc());

    assert!(report.daily_activity.is_empty());
    assert!(report.github_style_data.is_empty());
    assert!(report.first_conversation.is_none());
}

#[test]
fn test_fixed_offset_moves_the_date() {
    // 2023-12-31T23:30:00Z is already 2024-01-01 at UTC+1
    let conversations = vec![Conversation::new("Late").with_create_time(1_704_065_400.0)];

    let utc_report = analyze(&conversations, &utc());
    let cet_report = analyze(
        &conversations,
        &AnalysisConfig::new().with_time_basis(TimeBasis::Fixed(3600)),
    );

    assert_eq!(utc_report.yearly_activity.get(&2023), Some(&1));
    assert_eq!(cet_report.yearly_activity.get(&2024), Some(&1));
    assert_eq!(cet_report.hourly_activity.get(&0), Some(&1));
}

#[test]
fn test_most_active_ties_follow_record_order() {
    // Exports list newest first: 2024-03-02 12:00Z before 2024-03-01 00:00Z
    let conversations = vec![
        Conversation::new("Newer").with_create_time(1_709_380_800.0),
        Conversation::new("Older").with_create_time(1_709_251_200.0),
    ];
    let report = analyze(&conversations, &utc());

    assert_eq!(report.most_active_day, NaiveDate::from_ymd_opt(2024, 3, 2));
    assert_eq!(report.most_active_hour, Some(12));
    assert_eq!(report.most_active_month.as_deref(), Some("2024-03"));
}

#[test]
fn test_first_and_last_conversation_are_dates() {
    let conversations = vec![
        Conversation::new("Newer").with_create_time(1_709_380_800.0),
        Conversation::new("Older").with_create_time(1_709_251_200.0),
    ];
    let value: serde_json::Value =
        serde_json::from_str(&to_json(&analyze(&conversations, &utc())).unwrap()).unwrap();

    assert_eq!(value["first_conversation"], "2024-03-01");
    assert_eq!(value["last_conversation"], "2024-03-02");
}

// =========================================================================
// Malformed records
// =========================================================================

#[test]
fn test_malformed_records_are_counted_not_fatal() {
    let json = r#"[
        42,
        "a string",
        null,
        {"title": 17, "mapping": "not a map"},
        {"mapping": {"x": {"message": {"author": null, "content": {"parts": [{"asset_pointer": "file://1"}]}}}}},
        {"title": "Ok", "create_time": 1700000000, "mapping": {
            "m": {"message": {"author": {"role": "tool"}, "content": {"parts": ["tool output"]}}}
        }}
    ]"#;
    let report = analyze_json(json);

    assert_eq!(report.total_conversations, 6);
    assert_eq!(report.conversation_titles[0], "Untitled");
    assert_eq!(report.conversation_titles[3], "Untitled");
    assert_eq!(report.message_types.get("unknown"), Some(&1));
    assert_eq!(report.daily_activity.len(), 1);
}

#[test]
fn test_non_list_top_level_is_error() {
    for json in [r#"{"conversations": []}"#, "42", r#""text""#, "null"] {
        let err = ExportParser::new().parse_str(json).unwrap_err();
        assert!(err.is_invalid_format(), "{json} should be rejected");
    }
}

#[test]
fn test_invalid_json_is_parse_error() {
    let err = ExportParser::new().parse_str("[{\"title\": ").unwrap_err();
    assert!(err.is_parse());
}

// =========================================================================
// Calendar
// =========================================================================

#[test]
fn test_single_day_dataset() {
    let conversations = vec![
        Conversation::new("Morning").with_create_time(1_686_816_000.0),
        Conversation::new("Noon").with_create_time(1_686_830_400.0),
    ];
    let report = analyze(&conversations, &utc());
    let days = report.days_analysis.unwrap();

    assert_eq!(days.total_days, 1);
    assert_eq!(days.active_days, 1);
    assert_eq!(days.inactive_days, 0);
    assert_eq!(days.active_percentage + days.inactive_percentage, 100.0);
    assert_eq!(days.streaks.len(), 1);
    // Less than a whole day between first and last: rates are zero
    assert_eq!(report.conversations_per_day, 0.0);
}

#[test]
fn test_gap_produces_inactive_streak() {
    // 2024-01-01 09:00 and 2024-01-03 18:30 UTC
    let conversations = vec![
        Conversation::new("A").with_create_time(1_704_099_600.0),
        Conversation::new("B").with_create_time(1_704_306_600.0),
    ];
    let report = analyze(&conversations, &utc());
    let days = report.days_analysis.unwrap();

    assert_eq!(days.total_days, 3);
    assert_eq!(days.active_days, 2);
    assert_eq!(days.longest_inactive_streak, 1);
    assert_eq!(days.streaks.len(), 3);
    assert_eq!(days.active_percentage, 66.67);
    assert_eq!(days.inactive_percentage, 33.33);
    assert_eq!(report.github_style_data.len(), 366);
    assert_eq!(report.conversations_per_day, 1.0);
}

#[test]
fn test_activity_level_thresholds() {
    let base = 1_710_496_800.0; // 2024-03-15 10:00 UTC
    let conversations: Vec<_> = (0..11)
        .map(|i| Conversation::new(format!("c{i}")).with_create_time(base + f64::from(i)))
        .collect();
    let report = analyze(&conversations, &utc());
    let cell = report
        .github_style_data
        .iter()
        .find(|c| c.count > 0)
        .unwrap();

    assert_eq!(cell.count, 11);
    assert_eq!(cell.level, 4);
}

// =========================================================================
// Sentiment
// =========================================================================

#[test]
fn test_sentiment_thresholds_are_exclusive() {
    assert_eq!(SentimentClass::from_polarity(0.1), SentimentClass::Neutral);
    assert_eq!(SentimentClass::from_polarity(-0.1), SentimentClass::Neutral);
    assert_eq!(SentimentClass::from_polarity(0.11), SentimentClass::Positive);
    assert_eq!(SentimentClass::from_polarity(-0.11), SentimentClass::Negative);
    assert_eq!(SentimentClass::from_polarity(0.0), SentimentClass::Neutral);
}

#[test]
fn test_neutral_scorer_never_fails() {
    let analyzer = TextAnalyzer::new(create_scorer(SentimentBackend::Neutral), CodeDetection::Fence);
    let features = analyzer.analyze("I absolutely love this, it is wonderful!");
    assert_eq!(features.polarity, 0.0);
    assert_eq!(features.sentiment, SentimentClass::Neutral);
}

// =========================================================================
// Text
// =========================================================================

#[test]
fn test_unicode_and_emoji_text() {
    let conversations = vec![
        Conversation::new("Café ☕")
            .with_create_time(1_700_000_000.0)
            .with_message(ChatMessage::new(Role::User, "¿Qué es Rust? 🚀🚀")),
    ];
    let report = analyze(&conversations, &utc());

    assert_eq!(report.languages.get("español"), Some(&1));
    assert_eq!(report.emojis_used.get("🚀"), Some(&2));
    assert_eq!(report.question_patterns.get("preguntas"), Some(&1));
    assert_eq!(report.total_characters, "¿Qué es Rust? 🚀🚀".chars().count() as u64);
}

#[test]
fn test_code_fence_counts_once_per_message() {
    let text = "```rust\nfn main() {}\n```\nand\n```\nmore\n```";
    let conversations = vec![
        Conversation::new("Code")
            .with_create_time(1_700_000_000.0)
            .with_message(ChatMessage::new(Role::Assistant, text)),
    ];
    let report = analyze(&conversations, &utc());
    assert_eq!(report.code_blocks, 1);
}
