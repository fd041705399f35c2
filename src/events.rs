//! Server-sent events pushed to an open chat page.
//!
//! The browser keeps one `EventSource` per session. Whenever the
//! conversation changes the server re-renders the message list and sends
//! it as a [`ChatEvent::Messages`] event, followed by a
//! [`ChatEvent::Status`] event carrying the new phase. The stream is the
//! only writer of `#chat-messages` once the page has loaded.

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use serde::Serialize;

use crate::chat::ChatPhase;
use crate::ui::chat::phase_label;

/// Events emitted on a session's stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Freshly rendered message list.
    Messages {
        /// HTML for the contents of `#chat-messages`.
        html: String,
    },
    /// Phase of the conversation after the latest change.
    Status(StatusPayload),
}

/// JSON body of a [`ChatEvent::Status`] event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusPayload {
    /// `idle` or `sending`.
    pub phase: &'static str,
    /// Number of unanswered turns.
    pub in_flight: usize,
    /// Text for the status badge.
    pub label: String,
}

impl From<ChatPhase> for StatusPayload {
    fn from(phase: ChatPhase) -> Self {
        let label = phase_label(phase);
        match phase {
            ChatPhase::Idle => Self {
                phase: "idle",
                in_flight: 0,
                label,
            },
            ChatPhase::Sending { in_flight } => Self {
                phase: "sending",
                in_flight,
                label,
            },
        }
    }
}

/// Get the SSE event name for a [`ChatEvent`].
pub fn event_name(evt: &ChatEvent) -> &'static str {
    match evt {
        ChatEvent::Messages { .. } => "messages",
        ChatEvent::Status(_) => "status",
    }
}

impl From<ChatEvent> for Event {
    fn from(evt: ChatEvent) -> Self {
        let name = event_name(&evt);
        let data = match evt {
            // `Event::data` splits on `\n` but rejects `\r`.
            ChatEvent::Messages { html } => html.replace('\r', ""),
            ChatEvent::Status(status) => serde_json::to_string(&status).unwrap_or_else(|e| {
                serde_json::json!({ "phase": "error", "message": e.to_string() }).to_string()
            }),
        };
        Event::default().event(name).data(data)
    }
}

/// Wrap an event stream with periodic keep-alive comments.
pub fn build_sse_response<S>(
    stream: S,
    keep_alive: Duration,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send>
where
    S: Stream<Item = Result<Event, Infallible>> + Send + 'static,
{
    Sse::new(stream).keep_alive(KeepAlive::new().interval(keep_alive))
}
