//! In-memory chat history
//!
//! Bounded ring of the most recent turns, kept only for the legacy weekly
//! summary. Oldest turns are evicted on overflow; nothing else evicts.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::ChatRole;
use crate::CHAT_HISTORY_CAPACITY;

/// One side of an exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Ring buffer of recent turns
#[derive(Debug)]
pub struct ChatHistory {
    turns: VecDeque<ChatTurn>,
    capacity: usize,
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatHistory {
    /// Create history with the default capacity (100 turns)
    pub fn new() -> Self {
        Self::with_capacity(CHAT_HISTORY_CAPACITY)
    }

    /// Create history with a custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a turn, evicting the oldest when full
    pub fn push(&mut self, turn: ChatTurn) {
        if self.capacity == 0 {
            return;
        }
        while self.turns.len() >= self.capacity {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
    }

    /// Add a user turn and the bot reply
    pub fn push_exchange(&mut self, user: &str, bot: &str) {
        self.push(ChatTurn::new(ChatRole::User, user));
        self.push(ChatTurn::new(ChatRole::Bot, bot));
    }

    /// Get all turns (oldest first)
    pub fn turns(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter()
    }

    /// Content of user turns (oldest first)
    pub fn user_messages(&self) -> impl Iterator<Item = &str> {
        self.turns
            .iter()
            .filter(|t| t.role == ChatRole::User)
            .map(|t| t.content.as_str())
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_exchange() {
        let mut history = ChatHistory::new();
        assert!(history.is_empty());

        history.push_exchange("I feel sad", "I'm here for you");
        assert_eq!(history.len(), 2);
        assert_eq!(history.user_messages().collect::<Vec<_>>(), vec!["I feel sad"]);
    }

    #[test]
    fn test_evicts_oldest_on_overflow() {
        let mut history = ChatHistory::with_capacity(3);

        history.push(ChatTurn::new(ChatRole::User, "one"));
        history.push(ChatTurn::new(ChatRole::Bot, "two"));
        history.push(ChatTurn::new(ChatRole::User, "three"));
        history.push(ChatTurn::new(ChatRole::Bot, "four"));

        assert_eq!(history.len(), 3);
        assert_eq!(history.turns().next().unwrap().content, "two");
    }

    #[test]
    fn test_default_capacity_holds_fifty_exchanges() {
        let mut history = ChatHistory::new();
        for i in 0..60 {
            history.push_exchange(&format!("u{i}"), &format!("b{i}"));
        }
        assert_eq!(history.len(), CHAT_HISTORY_CAPACITY);
        assert_eq!(history.turns().next().unwrap().content, "u10");
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut history = ChatHistory::with_capacity(0);
        history.push_exchange("a", "b");
        assert!(history.is_empty());
    }
}
