//! Conversation model.
//!
//! # Overview
//!
//! - [`Message`], [`Sender`], [`MessageId`]: the append-only message list
//! - [`ChatState`]: draft handling, turn bookkeeping and reply ordering
//!
//! # Example
//!
//! ```rust
//! use doc_chat::chat::{ChatState, TurnOutcome};
//!
//! let mut chat = ChatState::default();
//! chat.set_draft("Was ist im Dokument X?");
//! let turn = chat.submit().unwrap();
//! assert_eq!(chat.len(), 2);
//!
//! chat.complete(turn.id, TurnOutcome::Answered("Dokument X behandelt...".into()));
//! assert_eq!(chat.len(), 3);
//! ```

mod message;
mod state;

pub use message::{IdGenerator, Message, MessageId, Sender, TurnId};
pub use state::{
    ChatPhase, ChatSettings, ChatState, DEFAULT_ERROR_PREFIX, DEFAULT_GREETING, FailurePolicy,
    ReplyOrdering, Turn, TurnOutcome,
};
