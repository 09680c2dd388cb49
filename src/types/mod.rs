//! Core types for Moodwell

mod activity;
mod band;
mod chart;
mod chat;
mod emotion;
mod history;
mod mood;
mod output;
mod patterns;
mod plan;
mod summary;

pub use activity::{NewActivity, SelfHelpActivity};
pub use band::MoodBand;
pub use chart::{
    ComprehensiveReport, CorrelationChart, EmotionDistributionChart, MoodTrendChart, TrendPoint,
    WeeklyHeatmapChart,
};
pub use chat::{ChatMessage, ChatRole, NewChatMessage};
pub use emotion::EmotionScores;
pub use history::{ChatHistory, ChatTurn};
pub use mood::{EntryType, MoodEntry, NewMoodEntry};
pub use output::ClassificationOutput;
pub use patterns::{
    weekday_name, WeekdayMap, WeekdayPatternData, WeekdayPatterns, WeekdayStats, WEEKDAYS,
};
pub use plan::{BreathingExercise, CbtExercise, Exercise, ExerciseNames, SelfHelpPlan};
pub use summary::{
    ExportDump, LegacySummary, MoodTrend, MoodTrendPoint, MoodTrendSeries, OverviewStats,
    WeeklySummary,
};
