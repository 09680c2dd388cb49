//! Mood journal entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::EmotionScores;

/// How the entry text was captured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    #[default]
    Text,
    Voice,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Text => "text",
            EntryType::Voice => "voice",
        }
    }

    /// Parse a stored tag; unknown tags read as `Text`
    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("voice") {
            EntryType::Voice
        } else {
            EntryType::Text
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored mood entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: i64,
    pub user_id: String,
    pub date: DateTime<Utc>,
    pub mood_text: String,
    /// 1-10
    pub mood_rating: i64,
    pub detected_emotions: EmotionScores,
    pub entry_type: EntryType,
}

/// A mood entry about to be stored
#[derive(Debug, Clone)]
pub struct NewMoodEntry {
    pub date: DateTime<Utc>,
    pub mood_text: String,
    pub mood_rating: i64,
    pub detected_emotions: EmotionScores,
    pub entry_type: EntryType,
}

impl NewMoodEntry {
    /// Entry dated now
    pub fn new(
        mood_text: impl Into<String>,
        mood_rating: i64,
        detected_emotions: EmotionScores,
    ) -> Self {
        Self {
            date: Utc::now(),
            mood_text: mood_text.into(),
            mood_rating,
            detected_emotions,
            entry_type: EntryType::Text,
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    pub fn with_entry_type(mut self, entry_type: EntryType) -> Self {
        self.entry_type = entry_type;
        self
    }
}
