//! Completed self-help activities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored activity completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfHelpActivity {
    pub id: i64,
    pub user_id: String,
    /// breathing, meditation, affirmation, cbt, ...
    pub activity_type: String,
    pub timestamp: DateTime<Utc>,
    pub duration_seconds: Option<i64>,
    /// 1-5, how helpful it was
    pub completion_rating: Option<i64>,
}

/// An activity completion about to be stored
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub activity_type: String,
    pub timestamp: DateTime<Utc>,
    pub duration_seconds: Option<i64>,
    pub completion_rating: Option<i64>,
}

impl NewActivity {
    pub fn new(activity_type: impl Into<String>) -> Self {
        Self {
            activity_type: activity_type.into(),
            timestamp: Utc::now(),
            duration_seconds: None,
            completion_rating: None,
        }
    }

    pub fn with_duration(mut self, seconds: i64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    pub fn with_rating(mut self, rating: i64) -> Self {
        self.completion_rating = Some(rating);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
