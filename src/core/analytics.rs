//! Analytics over stored records
//!
//! Every function here is pure: records in, payload out, with `now` passed
//! explicitly. Empty inputs produce explicit empty-state payloads.

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use lazy_static::lazy_static;
use regex::Regex;

use crate::core::store::RecordCounts;
use crate::types::{
    weekday_name, ChatHistory, ChatMessage, EmotionScores, ExportDump, LegacySummary, MoodEntry,
    MoodTrend, MoodTrendPoint, MoodTrendSeries, OverviewStats, SelfHelpActivity, WeekdayMap,
    WeekdayPatternData, WeekdayPatterns, WeekdayStats, WeeklySummary, WEEKDAYS,
};
use crate::{SUMMARY_WINDOW_DAYS, TREND_THRESHOLD};

const NO_DATA: &str = "No data";

// =============================================================================
// Legacy chat keywords, counted once per message on word boundaries
// =============================================================================

const CHAT_KEYWORDS: [&str; 8] = [
    "anxious",
    "overwhelmed",
    "sad",
    "lonely",
    "hopeful",
    "calm",
    "better",
    "happy",
];

lazy_static! {
    static ref CHAT_KEYWORD_PATTERNS: Vec<(&'static str, Regex)> = CHAT_KEYWORDS
        .iter()
        .map(|word| (*word, Regex::new(&format!(r"\b{}\b", word)).unwrap()))
        .collect();
}

/// Round to one decimal place, ties to even
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

fn mean_rating(entries: &[&MoodEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    entries.iter().map(|e| e.mood_rating as f64).sum::<f64>() / entries.len() as f64
}

/// Entries dated within `[now - days, now]`, oldest first
fn in_window(entries: &[MoodEntry], days: i64, now: DateTime<Utc>) -> Vec<&MoodEntry> {
    let start = now - Duration::days(days);
    let mut window: Vec<&MoodEntry> = entries
        .iter()
        .filter(|e| e.date >= start && e.date <= now)
        .collect();
    window.sort_by_key(|e| e.date);
    window
}

/// Summed score per label across entries
pub fn emotion_mass<'a>(entries: impl IntoIterator<Item = &'a MoodEntry>) -> EmotionScores {
    let mut total = EmotionScores::new();
    for entry in entries {
        total.accumulate(&entry.detected_emotions);
    }
    total
}

/// Compare the first half of the ratings against the rest.
///
/// For odd counts the middle rating goes to the second half.
pub fn mood_trend(ratings: &[i64]) -> MoodTrend {
    if ratings.is_empty() {
        return MoodTrend::NoData;
    }
    if ratings.len() < 2 {
        return MoodTrend::InsufficientData;
    }
    let (first, second) = ratings.split_at(ratings.len() / 2);
    let avg = |half: &[i64]| half.iter().sum::<i64>() as f64 / half.len() as f64;
    let (first_avg, second_avg) = (avg(first), avg(second));

    if second_avg > first_avg + TREND_THRESHOLD {
        MoodTrend::Improving
    } else if second_avg < first_avg - TREND_THRESHOLD {
        MoodTrend::Declining
    } else {
        MoodTrend::Stable
    }
}

// =============================================================================
// Weekly summary
// =============================================================================

/// Summary of the last seven days of mood entries
pub fn weekly_summary(entries: &[MoodEntry], now: DateTime<Utc>) -> WeeklySummary {
    let start = now - Duration::days(SUMMARY_WINDOW_DAYS);
    let week_start = start.format("%Y-%m-%d").to_string();
    let week_end = now.format("%Y-%m-%d").to_string();

    let window = in_window(entries, SUMMARY_WINDOW_DAYS, now);
    if window.is_empty() {
        return WeeklySummary {
            week_start,
            week_end,
            average_mood: 0.0,
            total_entries: 0,
            mood_trend: MoodTrend::NoData,
            dominant_emotion: NO_DATA.to_string(),
            top_emotions: Vec::new(),
            insights: vec!["No mood data available for this week".to_string()],
        };
    }

    let average = mean_rating(&window);
    let ratings: Vec<i64> = window.iter().map(|e| e.mood_rating).collect();
    let mass = emotion_mass(window.iter().copied());
    let dominant = mass.dominant();

    WeeklySummary {
        week_start,
        week_end,
        average_mood: round1(average),
        total_entries: window.len(),
        mood_trend: mood_trend(&ratings),
        insights: weekly_insights(average, &dominant),
        dominant_emotion: dominant,
        top_emotions: mass.top(3),
    }
}

fn weekly_insights(average: f64, dominant: &str) -> Vec<String> {
    let mut insights = Vec::new();
    if average >= 7.0 {
        insights.push("You had a great week! Your mood was consistently positive.".to_string());
    } else if average >= 5.0 {
        insights.push("You had a decent week with balanced emotions.".to_string());
    } else {
        insights.push("This week was challenging. Consider self-care activities.".to_string());
    }

    match dominant {
        "joy" | "optimism" => insights.push(format!(
            "Your dominant emotion was {} - keep up the positive energy!",
            dominant
        )),
        "anxiety" | "sadness" => insights.push(format!(
            "You experienced {} frequently. Consider relaxation techniques.",
            dominant
        )),
        _ => {}
    }
    insights
}

// =============================================================================
// Legacy chat summary
// =============================================================================

/// Free-text weekly summary served on the older route.
///
/// With mood entries in the window, summarizes them. Otherwise counts
/// emotional keywords in the user side of the in-memory chat history.
pub fn legacy_summary(
    history: &ChatHistory,
    entries: &[MoodEntry],
    now: DateTime<Utc>,
) -> LegacySummary {
    let window = in_window(entries, SUMMARY_WINDOW_DAYS, now);
    if window.is_empty() {
        return LegacySummary {
            summary: chat_keyword_summary(history),
            average_mood: None,
            top_emotions: None,
        };
    }

    let average = mean_rating(&window);
    let top = emotion_mass(window.iter().copied()).top(3);

    let mut summary = format!("This week, your average mood was {:.1}/10. ", average);
    if !top.is_empty() {
        let names: Vec<&str> = top.iter().map(|(label, _)| label.as_str()).collect();
        summary.push_str(&format!(
            "Your most prominent emotions were: {}. ",
            names.join(", ")
        ));
    }
    summary.push_str(if average >= 7.0 {
        "You've been doing well this week! Keep up the positive momentum."
    } else if average >= 5.0 {
        "Your mood has been moderate. Consider some self-care activities."
    } else {
        "It seems like you've had some challenging moments. Remember, it's okay to seek support."
    });

    LegacySummary {
        summary,
        average_mood: Some(average),
        top_emotions: Some(top),
    }
}

fn chat_keyword_summary(history: &ChatHistory) -> String {
    if history.is_empty() {
        return "No chat history available for this week.".to_string();
    }

    let mut counts: Vec<(&str, usize)> = CHAT_KEYWORDS.iter().map(|w| (*w, 0)).collect();
    for message in history.user_messages() {
        let lower = message.to_lowercase();
        for (slot, (_, pattern)) in counts.iter_mut().zip(CHAT_KEYWORD_PATTERNS.iter()) {
            if pattern.is_match(&lower) {
                slot.1 += 1;
            }
        }
    }
    // stable: equal counts keep keyword order
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let parts: Vec<String> = counts
        .iter()
        .filter(|(_, count)| *count > 0)
        .take(4)
        .map(|(word, count)| format!("{}x '{}'", count, word))
        .collect();

    if parts.is_empty() {
        "This week, your conversations were balanced without strong emotional words.".to_string()
    } else {
        format!("This week, you often expressed: {}.", parts.join(", "))
    }
}

// =============================================================================
// Weekday patterns
// =============================================================================

/// All-time entries bucketed by UTC weekday, Monday first
pub fn weekday_patterns(entries: &[MoodEntry]) -> WeekdayPatterns {
    if entries.is_empty() {
        return WeekdayPatterns {
            data: WeekdayPatternData {
                most_active_day: NO_DATA.to_string(),
                avg_daily_entries: 0.0,
                consistency_score: 0.0,
                weekday_averages: WeekdayMap::empty(),
                weekly_breakdown: None,
            },
            message: Some("Not enough data for weekly patterns".to_string()),
            total_entries: 0,
            days_with_data: None,
        };
    }

    let mut buckets: Vec<(Weekday, Vec<i64>)> = WEEKDAYS.iter().map(|d| (*d, Vec::new())).collect();
    for entry in entries {
        let day = entry.date.weekday();
        if let Some((_, ratings)) = buckets.iter_mut().find(|(d, _)| *d == day) {
            ratings.push(entry.mood_rating);
        }
    }

    let breakdown: WeekdayMap<WeekdayStats> = buckets
        .iter()
        .map(|(day, ratings)| {
            let average = if ratings.is_empty() {
                0.0
            } else {
                round1(ratings.iter().sum::<i64>() as f64 / ratings.len() as f64)
            };
            (
                *day,
                WeekdayStats {
                    count: ratings.len(),
                    average,
                },
            )
        })
        .collect();

    // first maximum in Monday-first order
    let mut most_active = (Weekday::Mon, 0usize);
    for (day, stats) in breakdown.iter() {
        if stats.count > most_active.1 {
            most_active = (*day, stats.count);
        }
    }

    let total = entries.len();
    let ideal = total as f64 / 7.0;
    let variance = breakdown
        .iter()
        .map(|(_, stats)| (stats.count as f64 - ideal).powi(2))
        .sum::<f64>()
        / 7.0;
    let consistency = if ideal > 0.0 {
        (100.0 - variance / ideal * 100.0).max(0.0)
    } else {
        0.0
    };
    let days_with_data = breakdown.iter().filter(|(_, s)| s.count > 0).count();

    WeekdayPatterns {
        data: WeekdayPatternData {
            most_active_day: weekday_name(most_active.0).to_string(),
            avg_daily_entries: round1(ideal),
            consistency_score: round1(consistency),
            weekday_averages: breakdown.iter().map(|(d, s)| (*d, s.average)).collect(),
            weekly_breakdown: Some(breakdown),
        },
        message: None,
        total_entries: total,
        days_with_data: Some(days_with_data),
    }
}

// =============================================================================
// Overview and export
// =============================================================================

/// Totals plus the rolling seven-day mood view
pub fn overview(counts: RecordCounts, entries: &[MoodEntry], now: DateTime<Utc>) -> OverviewStats {
    let recent = in_window(entries, SUMMARY_WINDOW_DAYS, now);
    OverviewStats {
        total_mood_entries: counts.mood_entries,
        total_chat_messages: counts.chat_messages,
        total_self_help_activities: counts.self_help_activities,
        recent_average_mood: round1(mean_rating(&recent)),
        streak_days: recent.len(),
    }
}

/// Dump of every record
pub fn export(
    mood_entries: Vec<MoodEntry>,
    chat_messages: Vec<ChatMessage>,
    self_help_activities: Vec<SelfHelpActivity>,
    now: DateTime<Utc>,
) -> ExportDump {
    let total_records = mood_entries.len() + chat_messages.len() + self_help_activities.len();
    ExportDump {
        mood_entries,
        chat_messages,
        self_help_activities,
        export_timestamp: now,
        total_records,
    }
}

/// Last `days` days as `{date, rating, emotion}`, newest first
pub fn mood_trend_series(entries: &[MoodEntry], days: i64, now: DateTime<Utc>) -> MoodTrendSeries {
    let mut window = in_window(entries, days, now);
    window.reverse();

    let data: Vec<MoodTrendPoint> = window
        .into_iter()
        .map(|e| MoodTrendPoint {
            date: e.date,
            rating: e.mood_rating,
            emotion: e.detected_emotions.dominant(),
        })
        .collect();

    let message = data
        .is_empty()
        .then(|| "No mood data available".to_string());
    MoodTrendSeries {
        data,
        days,
        message,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatTurn, ChatRole, EntryType};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        // a Sunday
        Utc.with_ymd_and_hms(2024, 3, 17, 12, 0, 0).unwrap()
    }

    fn entry(id: i64, date: DateTime<Utc>, rating: i64, emotions: &[(&str, f64)]) -> MoodEntry {
        MoodEntry {
            id,
            user_id: "default_user".to_string(),
            date,
            mood_text: "x".to_string(),
            mood_rating: rating,
            detected_emotions: emotions
                .iter()
                .map(|(l, s)| (l.to_string(), *s))
                .collect(),
            entry_type: EntryType::Text,
        }
    }

    fn days_ago(d: i64) -> DateTime<Utc> {
        now() - Duration::days(d)
    }

    #[test]
    fn test_trend_rules() {
        assert_eq!(mood_trend(&[]), MoodTrend::NoData);
        assert_eq!(mood_trend(&[5]), MoodTrend::InsufficientData);
        assert_eq!(mood_trend(&[3, 3, 8, 9]), MoodTrend::Improving);
        assert_eq!(mood_trend(&[9, 8, 3, 3]), MoodTrend::Declining);
        assert_eq!(mood_trend(&[5, 5, 5]), MoodTrend::Stable);
        // exactly 0.5 apart is still stable
        assert_eq!(mood_trend(&[5, 6, 5, 6]), MoodTrend::Stable);
    }

    #[test]
    fn test_weekly_summary_empty_state() {
        let summary = weekly_summary(&[], now());
        assert_eq!(summary.total_entries, 0);
        assert_eq!(summary.average_mood, 0.0);
        assert_eq!(summary.mood_trend, MoodTrend::NoData);
        assert_eq!(summary.dominant_emotion, "No data");
        assert_eq!(summary.insights, vec!["No mood data available for this week"]);
        assert_eq!(summary.week_start, "2024-03-10");
        assert_eq!(summary.week_end, "2024-03-17");
    }

    #[test]
    fn test_weekly_summary_improving_week() {
        let entries = vec![
            entry(4, days_ago(1), 9, &[("joy", 0.9)]),
            entry(1, days_ago(6), 3, &[("sadness", 0.8)]),
            entry(2, days_ago(5), 3, &[("sadness", 0.2)]),
            entry(3, days_ago(2), 8, &[("joy", 0.7)]),
            // outside the window
            entry(5, days_ago(20), 1, &[("anger", 5.0)]),
        ];
        let summary = weekly_summary(&entries, now());
        assert_eq!(summary.total_entries, 4);
        assert_eq!(summary.average_mood, 5.8);
        assert_eq!(summary.mood_trend, MoodTrend::Improving);
        assert_eq!(summary.dominant_emotion, "joy");
        assert_eq!(summary.top_emotions[0].0, "joy");
        assert_eq!(summary.top_emotions[1].0, "sadness");
        assert_eq!(summary.insights.len(), 2);
        assert!(summary.insights[0].contains("decent week"));
        assert!(summary.insights[1].contains("positive energy"));
    }

    #[test]
    fn test_weekly_summary_single_entry() {
        let summary = weekly_summary(&[entry(1, days_ago(1), 5, &[])], now());
        assert_eq!(summary.mood_trend, MoodTrend::InsufficientData);
        assert_eq!(summary.dominant_emotion, "neutral");
    }

    #[test]
    fn test_weekday_patterns_empty() {
        let patterns = weekday_patterns(&[]);
        assert_eq!(patterns.data.most_active_day, "No data");
        assert_eq!(patterns.message.as_deref(), Some("Not enough data for weekly patterns"));
        assert_eq!(patterns.total_entries, 0);
    }

    #[test]
    fn test_weekday_patterns_one_per_day_is_fully_consistent() {
        let entries: Vec<MoodEntry> = (0..7)
            .map(|d| entry(d, days_ago(d), 5, &[]))
            .collect();
        let patterns = weekday_patterns(&entries);
        assert_eq!(patterns.data.consistency_score, 100.0);
        assert_eq!(patterns.data.avg_daily_entries, 1.0);
        assert_eq!(patterns.data.most_active_day, "Monday");
        assert_eq!(patterns.days_with_data, Some(7));
    }

    #[test]
    fn test_weekday_patterns_single_day() {
        // three entries, all on Sunday
        let entries: Vec<MoodEntry> = [4, 6, 8]
            .iter()
            .enumerate()
            .map(|(i, r)| entry(i as i64, days_ago(7 * i as i64), *r, &[]))
            .collect();
        let patterns = weekday_patterns(&entries);
        assert_eq!(patterns.data.most_active_day, "Sunday");
        assert_eq!(patterns.data.weekday_averages.get(Weekday::Sun), Some(&6.0));
        assert_eq!(patterns.data.weekday_averages.get(Weekday::Mon), Some(&0.0));
        assert_eq!(patterns.data.consistency_score, 0.0);
        assert_eq!(patterns.days_with_data, Some(1));

        let json = serde_json::to_value(&patterns).unwrap();
        let keys: Vec<&String> = json["data"]["weekday_averages"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(keys.len(), 7);
    }

    #[test]
    fn test_overview_counts_recent_entries() {
        let entries = vec![
            entry(1, days_ago(1), 6, &[]),
            entry(2, days_ago(3), 7, &[]),
            entry(3, days_ago(30), 1, &[]),
        ];
        let counts = RecordCounts {
            mood_entries: 3,
            chat_messages: 4,
            self_help_activities: 1,
        };
        let stats = overview(counts, &entries, now());
        assert_eq!(stats.total_mood_entries, 3);
        assert_eq!(stats.total_chat_messages, 4);
        assert_eq!(stats.recent_average_mood, 6.5);
        assert_eq!(stats.streak_days, 2);
    }

    #[test]
    fn test_export_empty() {
        let dump = export(Vec::new(), Vec::new(), Vec::new(), now());
        assert_eq!(dump.total_records, 0);
        assert_eq!(dump.export_timestamp, now());
    }

    #[test]
    fn test_legacy_summary_without_history() {
        let summary = legacy_summary(&ChatHistory::new(), &[], now());
        assert_eq!(summary.summary, "No chat history available for this week.");
        assert_eq!(summary.average_mood, None);
    }

    #[test]
    fn test_legacy_summary_counts_keywords() {
        let mut history = ChatHistory::new();
        history.push_exchange("I feel sad and lonely", "I'm here.");
        history.push_exchange("Still sad, sadness everywhere", "Let's talk.");
        history.push(ChatTurn::new(ChatRole::Bot, "happy happy"));
        history.push_exchange("A bit calmer now", "Good.");

        let summary = legacy_summary(&history, &[], now());
        assert_eq!(
            summary.summary,
            "This week, you often expressed: 2x 'sad', 1x 'lonely'."
        );
    }

    #[test]
    fn test_legacy_summary_balanced() {
        let mut history = ChatHistory::new();
        history.push_exchange("The weather is nice", "Indeed.");
        let summary = legacy_summary(&history, &[], now());
        assert!(summary.summary.contains("balanced"));
    }

    #[test]
    fn test_legacy_summary_with_entries() {
        let entries = vec![
            entry(1, days_ago(1), 8, &[("joy", 0.9), ("trust", 0.2)]),
            entry(2, days_ago(2), 8, &[("joy", 0.5)]),
        ];
        let summary = legacy_summary(&ChatHistory::new(), &entries, now());
        assert_eq!(
            summary.summary,
            "This week, your average mood was 8.0/10. Your most prominent emotions were: joy, trust. \
             You've been doing well this week! Keep up the positive momentum."
        );
        assert_eq!(summary.average_mood, Some(8.0));
    }

    #[test]
    fn test_mood_trend_series_newest_first() {
        let entries = vec![
            entry(1, days_ago(5), 4, &[("fear", 1.0)]),
            entry(2, days_ago(1), 7, &[("joy", 1.0)]),
            entry(3, days_ago(40), 2, &[]),
        ];
        let series = mood_trend_series(&entries, 30, now());
        let ratings: Vec<i64> = series.data.iter().map(|p| p.rating).collect();
        assert_eq!(ratings, vec![7, 4]);
        assert_eq!(series.data[0].emotion, "joy");
        assert_eq!(series.message, None);

        let empty = mood_trend_series(&entries, 0, now());
        assert!(empty.data.is_empty());
        assert!(empty.message.is_some());
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(5.75), 5.8);
        assert_eq!(round1(6.25), 6.2);
        assert_eq!(round1(6.0), 6.0);
    }

    #[test]
    fn test_average_mood_ties_round_to_even() {
        let entries: Vec<MoodEntry> = [6, 6, 6, 7]
            .iter()
            .enumerate()
            .map(|(i, rating)| entry(i as i64 + 1, days_ago(i as i64 + 1), *rating, &[]))
            .collect();

        assert_eq!(weekly_summary(&entries, now()).average_mood, 6.2);
        let stats = overview(RecordCounts::default(), &entries, now());
        assert_eq!(stats.recent_average_mood, 6.2);
    }
}
