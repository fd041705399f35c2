//! Chat message model and identifier generation.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing into the chat.
    User,
    /// The query backend (or the greeting / error notices on its behalf).
    Assistant,
}

impl Sender {
    /// CSS modifier used by the message list (`message user`, `message assistant`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message identifier, derived from the wall clock in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlation id tying a user query to the reply it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(pub u64);

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn-{}", self.0)
    }
}

/// A single entry in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique within the owning session.
    pub id: MessageId,
    /// Who wrote the message.
    pub sender: Sender,
    /// Message body, shown verbatim.
    pub text: String,
    /// Turn this message answers. Only set on assistant replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<TurnId>,
}

impl Message {
    /// Build a user message.
    #[must_use]
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            sender: Sender::User,
            text: text.into(),
            reply_to: None,
        }
    }

    /// Build an assistant message, optionally answering a turn.
    #[must_use]
    pub fn assistant(id: MessageId, text: impl Into<String>, reply_to: Option<TurnId>) -> Self {
        Self {
            id,
            sender: Sender::Assistant,
            text: text.into(),
            reply_to,
        }
    }
}

/// Hands out strictly increasing, timestamp-based message ids.
///
/// Ids track the millisecond clock but never repeat: when two ids are
/// requested within the same millisecond (or the clock steps backwards)
/// the generator bumps past the last one it issued.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Create a generator that has not issued any id yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id, using the current wall clock.
    pub fn next_id(&mut self) -> MessageId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        self.next_id_at(now)
    }

    /// Next id for an explicit clock reading.
    pub fn next_id_at(&mut self, now_ms: u64) -> MessageId {
        let id = now_ms.max(self.last.saturating_add(1));
        self.last = id;
        MessageId(id)
    }
}
