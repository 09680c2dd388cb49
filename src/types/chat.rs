//! Chat messages, one row per side of an exchange

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::EmotionScores;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Bot => "bot",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "user" => Some(ChatRole::User),
            "bot" => Some(ChatRole::Bot),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub role: ChatRole,
    pub content: String,
    /// Only user messages carry scores
    pub detected_emotions: Option<EmotionScores>,
}

/// A chat message about to be stored
#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub timestamp: DateTime<Utc>,
    pub role: ChatRole,
    pub content: String,
    pub detected_emotions: Option<EmotionScores>,
}

impl NewChatMessage {
    /// User message dated now, with its scores
    pub fn user(content: impl Into<String>, emotions: EmotionScores) -> Self {
        Self {
            timestamp: Utc::now(),
            role: ChatRole::User,
            content: content.into(),
            detected_emotions: Some(emotions),
        }
    }

    /// Bot reply dated now
    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            role: ChatRole::Bot,
            content: content.into(),
            detected_emotions: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
