//! Moodwell: emotion-aware mood journal and self-help chatbot backend
//!
//! Text in → emotion scores → stored entry → self-help plan, with weekly,
//! weekday and overview analytics computed over the store.

pub mod config;
pub mod core;
pub mod error;
pub mod types;

// =============================================================================
// EMOTION LABELS
// =============================================================================

/// Fixed label set in canonical order.
///
/// The order is alphabetical, so a sorted map over these labels iterates in
/// canonical order. Every tie-break on labels resolves to the first label here.
pub const EMOTION_LABELS: [&str; 11] = [
    "anger",
    "anticipation",
    "disgust",
    "fear",
    "joy",
    "love",
    "optimism",
    "pessimism",
    "sadness",
    "surprise",
    "trust",
];

/// Returned by dominant-emotion lookups over an empty mapping
pub const NEUTRAL_EMOTION: &str = "neutral";

/// Score added per keyword hit in the fallback estimator
pub const KEYWORD_INCREMENT: f64 = 0.3;

/// Token budget for the primary classifier input
pub const MAX_CLASSIFIER_TOKENS: usize = 512;

// =============================================================================
// MOOD BANDS
// =============================================================================

/// Highest rating that still counts as a low mood
pub const LOW_MOOD_MAX: i64 = 4;

/// Highest rating that still counts as a medium mood
pub const MEDIUM_MOOD_MAX: i64 = 7;

/// Valid mood rating range
pub const MOOD_RATING_MIN: i64 = 1;
pub const MOOD_RATING_MAX: i64 = 10;

/// Valid completion rating range for self-help activities
pub const COMPLETION_RATING_MIN: i64 = 1;
pub const COMPLETION_RATING_MAX: i64 = 5;

// =============================================================================
// ANALYTICS
// =============================================================================

/// Length of the weekly summary / overview window
pub const SUMMARY_WINDOW_DAYS: i64 = 7;

/// Half-over-half difference that counts as a trend
pub const TREND_THRESHOLD: f64 = 0.5;

/// Capacity of the in-memory chat history (turns, both roles)
pub const CHAT_HISTORY_CAPACITY: usize = 100;

/// Owner tag for every record in this single-user version
pub const DEFAULT_USER_ID: &str = "default_user";

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "2.0.0";
