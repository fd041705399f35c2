//! Chat sessions and session storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use uuid::Uuid;

use crate::chat::{ChatPhase, ChatSettings, ChatState, Message, Turn, TurnId, TurnOutcome};

/// Default session timeout (30 minutes).
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// One page load's conversation.
///
/// Cloning is cheap and yields a handle to the same conversation.
/// Every change to the message list is announced through
/// [`ChatSession::subscribe`].
#[derive(Debug, Clone)]
pub struct ChatSession {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    /// Unique session identifier.
    id: String,
    /// Conversation state.
    chat: Mutex<ChatState>,
    /// Session creation time.
    created_at: DateTime<Utc>,
    /// Last activity time.
    last_activity: RwLock<DateTime<Utc>>,
    /// Latest message-list revision.
    changes: watch::Sender<u64>,
}

impl ChatSession {
    /// Create a new session with the given ID.
    fn new(id: String, settings: ChatSettings) -> Self {
        let now = Utc::now();
        let chat = ChatState::new(settings);
        let (changes, _) = watch::channel(chat.revision());
        Self {
            inner: Arc::new(SessionInner {
                id,
                chat: Mutex::new(chat),
                created_at: now,
                last_activity: RwLock::new(now),
                changes,
            }),
        }
    }

    /// Get the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    fn chat(&self) -> MutexGuard<'_, ChatState> {
        self.inner
            .chat
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Submit a draft.
    ///
    /// Returns the turn to send, or `None` for a blank draft. The user
    /// message is already part of the list when this returns.
    pub fn submit(&self, draft: impl Into<String>) -> Option<Turn> {
        let (turn, revision) = {
            let mut chat = self.chat();
            chat.set_draft(draft);
            let turn = chat.submit()?;
            (turn, chat.revision())
        };
        self.touch();
        self.inner.changes.send_replace(revision);
        Some(turn)
    }

    /// Feed a backend result back into the conversation.
    pub fn complete(&self, turn: TurnId, outcome: TurnOutcome) -> usize {
        let (appended, revision) = {
            let mut chat = self.chat();
            let appended = chat.complete(turn, outcome);
            (appended, chat.revision())
        };
        // The phase changed even when nothing was appended.
        self.inner.changes.send_replace(revision);
        appended
    }

    /// Copy of the message list.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Message> {
        self.chat().messages().to_vec()
    }

    /// Messages together with the phase, read under one lock.
    #[must_use]
    pub fn view(&self) -> (Vec<Message>, ChatPhase) {
        let chat = self.chat();
        (chat.messages().to_vec(), chat.phase())
    }

    /// Get the number of messages in the conversation.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.chat().len()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> ChatPhase {
        self.chat().phase()
    }

    /// Receiver that wakes on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.changes.subscribe()
    }

    /// Update the last activity timestamp.
    pub fn touch(&self) {
        let mut guard = self
            .inner
            .last_activity
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = Utc::now();
    }

    /// Check if the session has been idle longer than `timeout`.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        let last = *self
            .inner
            .last_activity
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // Negative durations mean clock skew; never expire on those.
        (Utc::now() - last)
            .to_std()
            .is_ok_and(|idle| idle > timeout)
    }

    /// Get the session age.
    #[must_use]
    pub fn age(&self) -> Duration {
        (Utc::now() - self.inner.created_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

/// Thread-safe store for sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

#[derive(Debug)]
struct SessionStoreInner {
    settings: ChatSettings,
    sessions: RwLock<HashMap<String, ChatSession>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(ChatSettings::default())
    }
}

impl SessionStore {
    /// Create a store whose sessions start from `settings`.
    #[must_use]
    pub fn new(settings: ChatSettings) -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                settings,
                sessions: RwLock::new(HashMap::new()),
            }),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, ChatSession>> {
        self.inner
            .sessions
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, ChatSession>> {
        self.inner
            .sessions
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Create a new session and return it.
    #[must_use]
    pub fn create(&self) -> ChatSession {
        let id = Uuid::new_v4().to_string();
        let session = ChatSession::new(id.clone(), self.inner.settings.clone());
        self.write().insert(id, session.clone());
        session
    }

    /// Get a session by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<ChatSession> {
        self.read().get(id).cloned()
    }

    /// Check whether a session is still stored.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    /// Remove a session by ID.
    pub fn remove(&self, id: &str) -> Option<ChatSession> {
        self.write().remove(id)
    }

    /// Get the number of active sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove sessions that have been inactive longer than the timeout.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_expired_with_timeout(&self, timeout: Duration) -> usize {
        let mut guard = self.write();
        let before = guard.len();
        guard.retain(|_, session| !session.is_expired_with_timeout(timeout));
        before - guard.len()
    }

    /// List all session IDs.
    #[must_use]
    pub fn list_ids(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Periodically drop idle sessions until the runtime shuts down.
    pub fn spawn_sweeper(
        &self,
        every: Duration,
        timeout: Duration,
    ) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let removed = store.cleanup_expired_with_timeout(timeout);
                if removed > 0 {
                    tracing::info!(
                        name: "session.expired",
                        removed,
                        remaining = store.len(),
                        "Removed idle sessions"
                    );
                }
            }
        })
    }
}
