//! Session management.
//!
//! Every page load gets its own [`ChatSession`]; reloading the page starts
//! a new one. Sessions live in memory only and are swept once idle.
//!
//! # Architecture
//!
//! - [`ChatSession`]: one conversation plus its change notifier
//! - [`SessionStore`]: thread-safe store for all active sessions
//! - [`spawn_turn`]: fire-and-forget backend call for a submitted turn
//!
//! # Example
//!
//! ```rust
//! use doc_chat::session::SessionStore;
//!
//! let store = SessionStore::default();
//! let session = store.create();
//! assert!(session.submit("Hello!").is_some());
//!
//! let messages = session.snapshot();
//! assert_eq!(messages.len(), 2);
//! ```

mod thread;
mod turn;

pub use thread::{ChatSession, DEFAULT_SESSION_TIMEOUT, SessionStore};
pub use turn::{run_turn, spawn_turn};
