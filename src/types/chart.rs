//! Chart data handed to the rendering side

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One rating on the trend line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: DateTime<Utc>,
    pub rating: i64,
}

/// Mood ratings over the last `days` days, oldest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodTrendChart {
    pub title: String,
    pub days: i64,
    pub points: Vec<TrendPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Top labels by summed score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionDistributionChart {
    pub title: String,
    pub slices: Vec<(String, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Weekday rows (Monday first) by ISO week columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyHeatmapChart {
    pub title: String,
    pub weekdays: Vec<&'static str>,
    pub weeks: Vec<u32>,
    /// `cells[weekday][week]`, `None` where there is no entry
    pub cells: Vec<Vec<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Pearson correlation over mood rating and the most variable labels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationChart {
    pub title: String,
    /// `mood_rating` first, then labels
    pub columns: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// All four charts together
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComprehensiveReport {
    pub mood_trend: MoodTrendChart,
    pub emotion_distribution: EmotionDistributionChart,
    pub weekly_heatmap: WeeklyHeatmapChart,
    pub mood_emotion_correlation: CorrelationChart,
}
