//! Chat message list component.

use leptos::prelude::*;

use crate::chat::Message;

/// The messages themselves, without the scroll container.
///
/// This is also what the send route and the event stream swap into
/// `#chat-messages`.
#[component]
pub fn MessageItems(
    /// Messages in display order.
    messages: Vec<Message>,
) -> impl IntoView {
    messages
        .into_iter()
        .map(|msg| {
            let class = format!("message {}", msg.sender);
            view! {
                <div class=class data-message-id=msg.id.to_string()>
                    {msg.text}
                </div>
            }
        })
        .collect_view()
}

/// Scrollable container holding the conversation.
///
/// `chat.js` subscribes to `data-events` and scrolls to the bottom after
/// every update.
#[component]
pub fn ChatMessageList(
    /// Session the list belongs to.
    session_id: String,
    /// Messages in display order.
    messages: Vec<Message>,
) -> impl IntoView {
    let events_url = format!("/chat/{session_id}/events");

    view! {
        <div
            id="chat-messages"
            class="chat"
            data-events=events_url
            role="log"
            aria-live="polite"
            aria-label="Chatverlauf"
        >
            <MessageItems messages=messages />
        </div>
    }
}
