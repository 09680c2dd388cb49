//! Analytics payloads: weekly summary, overview, export

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ChatMessage, MoodEntry, SelfHelpActivity};

/// Direction of mood across the summary window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoodTrend {
    Improving,
    Declining,
    Stable,
    /// Fewer than two entries
    #[serde(rename = "Insufficient data")]
    InsufficientData,
    /// No entries at all
    #[serde(rename = "No data")]
    NoData,
}

impl std::fmt::Display for MoodTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MoodTrend::Improving => "Improving",
            MoodTrend::Declining => "Declining",
            MoodTrend::Stable => "Stable",
            MoodTrend::InsufficientData => "Insufficient data",
            MoodTrend::NoData => "No data",
        };
        write!(f, "{}", name)
    }
}

/// Weekly summary over the last seven days of mood entries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    /// YYYY-MM-DD
    pub week_start: String,
    /// YYYY-MM-DD
    pub week_end: String,
    pub average_mood: f64,
    pub total_entries: usize,
    pub mood_trend: MoodTrend,
    pub dominant_emotion: String,
    /// Up to three labels by summed score
    pub top_emotions: Vec<(String, f64)>,
    pub insights: Vec<String>,
}

/// Chat-history summary kept for older clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacySummary {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_mood: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_emotions: Option<Vec<(String, f64)>>,
}

/// Totals and the rolling seven-day view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewStats {
    pub total_mood_entries: usize,
    pub total_chat_messages: usize,
    pub total_self_help_activities: usize,
    pub recent_average_mood: f64,
    /// Mood entries in the last seven days, not consecutive days
    pub streak_days: usize,
}

/// Full dump of every stored record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDump {
    pub mood_entries: Vec<MoodEntry>,
    pub chat_messages: Vec<ChatMessage>,
    pub self_help_activities: Vec<SelfHelpActivity>,
    pub export_timestamp: DateTime<Utc>,
    pub total_records: usize,
}

/// One point of the mood trend series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodTrendPoint {
    pub date: DateTime<Utc>,
    pub rating: i64,
    pub emotion: String,
}

/// Mood trend series for the analytics view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodTrendSeries {
    pub data: Vec<MoodTrendPoint>,
    pub days: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
