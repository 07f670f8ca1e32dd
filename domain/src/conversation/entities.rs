//! Conversation domain entities

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of turns (user + assistant messages) kept in model context.
pub const DEFAULT_HISTORY_TURNS: usize = 8;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A message in a conversation (Entity)
///
/// The system prompt is not a message; backends receive it separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Prior question/answer turns carried across questions (Entity)
///
/// Holds at most `capacity` turns; pushing beyond that drops the oldest.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    turns: VecDeque<Message>,
    capacity: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_TURNS)
    }
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a completed question/answer exchange.
    pub fn push_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.push(Message::user(question));
        self.push(Message::assistant(answer));
    }

    pub fn push(&mut self, message: Message) {
        if self.capacity == 0 {
            return;
        }
        while self.turns.len() >= self.capacity {
            self.turns.pop_front();
        }
        self.turns.push_back(message);
    }

    /// The most recent `limit` turns, oldest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &Message> {
        let skip = self.turns.len().saturating_sub(limit);
        self.turns.iter().skip(skip)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of complete question/answer pairs held.
    pub fn exchanges(&self) -> usize {
        self.turns.len() / 2
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_drops_oldest_turns() {
        let mut history = ConversationHistory::new();
        for i in 0..6 {
            history.push_exchange(format!("q{i}"), format!("a{i}"));
        }
        assert_eq!(history.len(), DEFAULT_HISTORY_TURNS);
        assert_eq!(history.exchanges(), 4);
        let first = history.recent(usize::MAX).next().unwrap();
        assert_eq!(first.content, "q2");
        assert_eq!(first.role, Role::User);
    }

    #[test]
    fn test_recent_limit() {
        let mut history = ConversationHistory::new();
        history.push_exchange("q0", "a0");
        history.push_exchange("q1", "a1");
        let recent: Vec<_> = history.recent(2).map(|m| m.content.as_str()).collect();
        assert_eq!(recent, vec!["q1", "a1"]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut history = ConversationHistory::with_capacity(0);
        history.push_exchange("q", "a");
        assert!(history.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut history = ConversationHistory::new();
        history.push_exchange("q", "a");
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }
}
