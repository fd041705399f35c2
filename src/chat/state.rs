//! Conversation state machine.
//!
//! [`ChatState`] owns the message list, the input draft and the set of
//! turns whose backend request is still in flight. It performs no I/O:
//! [`ChatState::submit`] hands out a [`Turn`] for the caller to send, and
//! [`ChatState::complete`] feeds the result back in.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::message::{IdGenerator, Message, TurnId};

/// Greeting shown as the first assistant message of every session.
pub const DEFAULT_GREETING: &str = "Hallo! Stelle eine Frage zu deinen hochgeladenen Dokumenten.";

/// Prefix for assistant messages that report a failed turn.
pub const DEFAULT_ERROR_PREFIX: &str = "Die Anfrage konnte nicht beantwortet werden: ";

/// What to do when the backend call for a turn fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Append an assistant message describing the failure.
    #[default]
    Surface,
    /// Drop the turn without any visible reply.
    Silent,
}

/// Order in which replies are appended when several turns overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyOrdering {
    /// Replies are held back until every earlier turn has resolved.
    #[default]
    Submission,
    /// Replies are appended as soon as they arrive.
    Arrival,
}

/// Tunables for a [`ChatState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Initial assistant message.
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Failure handling for backend calls.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Reply ordering across overlapping turns.
    #[serde(default)]
    pub reply_ordering: ReplyOrdering,
    /// Text placed in front of the failure reason.
    #[serde(default = "default_error_prefix")]
    pub error_prefix: String,
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

fn default_error_prefix() -> String {
    DEFAULT_ERROR_PREFIX.to_string()
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            failure_policy: FailurePolicy::default(),
            reply_ordering: ReplyOrdering::default(),
            error_prefix: default_error_prefix(),
        }
    }
}

/// Observable phase of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum ChatPhase {
    /// Nothing in flight.
    Idle,
    /// At least one backend request has not been resolved yet.
    Sending {
        /// Number of unresolved turns.
        in_flight: usize,
    },
}

impl ChatPhase {
    /// Whether no request is outstanding.
    #[must_use]
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// A submitted query waiting to be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Correlation id; pass it back to [`ChatState::complete`].
    pub id: TurnId,
    /// The text to send, exactly as typed.
    pub query: String,
}

/// Result of the backend call for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The backend replied with this content.
    Answered(String),
    /// The call failed; the string describes why.
    Failed(String),
}

#[derive(Debug, Clone)]
struct PendingTurn {
    id: TurnId,
    outcome: Option<TurnOutcome>,
}

/// In-memory conversation for one chat session.
#[derive(Debug, Clone)]
pub struct ChatState {
    settings: ChatSettings,
    messages: Vec<Message>,
    draft: String,
    ids: IdGenerator,
    next_turn: u64,
    pending: VecDeque<PendingTurn>,
    revision: u64,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new(ChatSettings::default())
    }
}

impl ChatState {
    /// Fresh conversation holding only the greeting.
    #[must_use]
    pub fn new(settings: ChatSettings) -> Self {
        let mut ids = IdGenerator::new();
        let greeting = Message::assistant(ids.next_id(), settings.greeting.clone(), None);
        Self {
            settings,
            messages: vec![greeting],
            draft: String::new(),
            ids,
            next_turn: 1,
            pending: VecDeque::new(),
            revision: 0,
        }
    }

    /// Messages in display order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false in practice: the greeting is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Counter bumped on every change to the message list.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current input draft.
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the input draft.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> ChatPhase {
        if self.pending.is_empty() {
            ChatPhase::Idle
        } else {
            ChatPhase::Sending {
                in_flight: self.pending.len(),
            }
        }
    }

    /// Submit the current draft.
    ///
    /// Returns `None`, leaving everything untouched, when the draft is
    /// blank. Otherwise the user message is appended, the draft cleared
    /// and the returned [`Turn`] must be sent by the caller.
    pub fn submit(&mut self) -> Option<Turn> {
        if self.draft.trim().is_empty() {
            return None;
        }

        let query = std::mem::take(&mut self.draft);
        let id = self.ids.next_id();
        self.push(Message::user(id, query.clone()));

        let turn_id = TurnId(self.next_turn);
        self.next_turn += 1;
        self.pending.push_back(PendingTurn {
            id: turn_id,
            outcome: None,
        });

        Some(Turn { id: turn_id, query })
    }

    /// Record the outcome of a turn and return how many messages were appended.
    ///
    /// Turns that are unknown or already resolved are ignored.
    pub fn complete(&mut self, turn: TurnId, outcome: TurnOutcome) -> usize {
        let Some(index) = self
            .pending
            .iter()
            .position(|p| p.id == turn && p.outcome.is_none())
        else {
            return 0;
        };

        match self.settings.reply_ordering {
            ReplyOrdering::Arrival => {
                self.pending.remove(index);
                usize::from(self.append_outcome(turn, outcome))
            }
            ReplyOrdering::Submission => {
                self.pending[index].outcome = Some(outcome);
                self.release_resolved()
            }
        }
    }

    /// Append replies for the resolved prefix of the pending queue.
    fn release_resolved(&mut self) -> usize {
        let mut appended = 0;
        while self.pending.front().is_some_and(|p| p.outcome.is_some()) {
            let Some(PendingTurn {
                id,
                outcome: Some(outcome),
            }) = self.pending.pop_front()
            else {
                break;
            };
            if self.append_outcome(id, outcome) {
                appended += 1;
            }
        }
        appended
    }

    fn append_outcome(&mut self, turn: TurnId, outcome: TurnOutcome) -> bool {
        let text = match outcome {
            TurnOutcome::Answered(content) => content,
            TurnOutcome::Failed(reason) => match self.settings.failure_policy {
                FailurePolicy::Surface => format!("{}{reason}", self.settings.error_prefix),
                FailurePolicy::Silent => return false,
            },
        };
        let id = self.ids.next_id();
        self.push(Message::assistant(id, text, Some(turn)));
        true
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Sender;

    fn state_with(ordering: ReplyOrdering, policy: FailurePolicy) -> ChatState {
        ChatState::new(ChatSettings {
            reply_ordering: ordering,
            failure_policy: policy,
            ..ChatSettings::default()
        })
    }

    fn submit(state: &mut ChatState, text: &str) -> Turn {
        state.set_draft(text);
        state.submit().expect("non-blank draft submits")
    }

    #[test]
    fn test_initial_state_has_greeting() {
        let state = ChatState::default();
        assert_eq!(state.len(), 1);
        assert_eq!(state.messages()[0].sender, Sender::Assistant);
        assert_eq!(state.messages()[0].text, DEFAULT_GREETING);
        assert_eq!(state.phase(), ChatPhase::Idle);
        assert_eq!(state.draft(), "");
    }

    #[test]
    fn test_blank_drafts_are_ignored() {
        let mut state = ChatState::default();
        for blank in ["", "   ", "\t\n"] {
            state.set_draft(blank);
            assert!(state.submit().is_none());
            assert_eq!(state.draft(), blank);
        }
        assert_eq!(state.len(), 1);
        assert_eq!(state.revision(), 0);
        assert!(state.phase().is_idle());
    }

    #[test]
    fn test_full_turn() {
        let mut state = ChatState::default();
        let turn = submit(&mut state, "Was ist im Dokument X?");

        assert_eq!(state.len(), 2);
        let last = state.messages().last().unwrap();
        assert_eq!(last.sender, Sender::User);
        assert_eq!(last.text, "Was ist im Dokument X?");
        assert_eq!(state.draft(), "");
        assert_eq!(state.phase(), ChatPhase::Sending { in_flight: 1 });
        assert_eq!(turn.query, "Was ist im Dokument X?");

        let appended = state.complete(
            turn.id,
            TurnOutcome::Answered("Dokument X behandelt...".into()),
        );
        assert_eq!(appended, 1);
        assert_eq!(state.len(), 3);
        let reply = state.messages().last().unwrap();
        assert_eq!(reply.sender, Sender::Assistant);
        assert_eq!(reply.text, "Dokument X behandelt...");
        assert_eq!(reply.reply_to, Some(turn.id));
        assert!(state.phase().is_idle());
    }

    #[test]
    fn test_turn_ids_are_distinct() {
        let mut state = ChatState::default();
        let turn = submit(&mut state, "frage");
        state.complete(turn.id, TurnOutcome::Answered("antwort".into()));

        let ids: Vec<_> = state.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_draft_is_sent_verbatim() {
        let mut state = ChatState::default();
        let turn = submit(&mut state, "  mit Leerzeichen ");
        assert_eq!(turn.query, "  mit Leerzeichen ");
        assert_eq!(state.messages()[1].text, "  mit Leerzeichen ");
    }

    #[test]
    fn test_rapid_submissions_precede_replies() {
        let mut state = ChatState::default();
        let a = submit(&mut state, "A");
        let b = submit(&mut state, "B");
        assert_ne!(a.id, b.id);
        assert_eq!(state.phase(), ChatPhase::Sending { in_flight: 2 });

        let texts: Vec<_> = state.messages()[1..].iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["A", "B"]);
        assert!(state.messages()[1..].iter().all(|m| m.sender == Sender::User));
    }

    #[test]
    fn test_submission_order_holds_back_late_turns() {
        let mut state = state_with(ReplyOrdering::Submission, FailurePolicy::Surface);
        let a = submit(&mut state, "A");
        let b = submit(&mut state, "B");

        assert_eq!(state.complete(b.id, TurnOutcome::Answered("re B".into())), 0);
        assert_eq!(state.len(), 3);

        assert_eq!(state.complete(a.id, TurnOutcome::Answered("re A".into())), 2);
        let replies: Vec<_> = state.messages()[3..]
            .iter()
            .map(|m| (m.text.as_str(), m.reply_to))
            .collect();
        assert_eq!(replies, [("re A", Some(a.id)), ("re B", Some(b.id))]);
        assert!(state.phase().is_idle());
    }

    #[test]
    fn test_arrival_order_appends_immediately() {
        let mut state = state_with(ReplyOrdering::Arrival, FailurePolicy::Surface);
        let a = submit(&mut state, "A");
        let b = submit(&mut state, "B");

        assert_eq!(state.complete(b.id, TurnOutcome::Answered("re B".into())), 1);
        assert_eq!(state.messages().last().unwrap().text, "re B");
        assert_eq!(state.phase(), ChatPhase::Sending { in_flight: 1 });

        assert_eq!(state.complete(a.id, TurnOutcome::Answered("re A".into())), 1);
        assert_eq!(state.messages().last().unwrap().text, "re A");
    }

    #[test]
    fn test_failure_is_surfaced() {
        let mut state = ChatState::default();
        let turn = submit(&mut state, "frage");
        state.complete(turn.id, TurnOutcome::Failed("connection refused".into()));

        let last = state.messages().last().unwrap();
        assert_eq!(last.sender, Sender::Assistant);
        assert_eq!(
            last.text,
            format!("{DEFAULT_ERROR_PREFIX}connection refused")
        );
        assert!(state.phase().is_idle());
    }

    #[test]
    fn test_silent_failure_does_not_block_later_replies() {
        let mut state = state_with(ReplyOrdering::Submission, FailurePolicy::Silent);
        let a = submit(&mut state, "A");
        let b = submit(&mut state, "B");

        state.complete(b.id, TurnOutcome::Answered("re B".into()));
        assert_eq!(state.complete(a.id, TurnOutcome::Failed("boom".into())), 1);
        assert_eq!(state.len(), 4);
        assert_eq!(state.messages().last().unwrap().text, "re B");
        assert!(state.phase().is_idle());
    }

    #[test]
    fn test_stale_and_duplicate_completions_are_ignored() {
        let mut state = ChatState::default();
        let turn = submit(&mut state, "frage");
        assert_eq!(state.complete(TurnId(99), TurnOutcome::Answered("x".into())), 0);
        assert_eq!(state.complete(turn.id, TurnOutcome::Answered("y".into())), 1);
        assert_eq!(state.complete(turn.id, TurnOutcome::Answered("z".into())), 0);
        assert_eq!(state.len(), 3);
    }
}
