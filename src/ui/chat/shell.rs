//! Chat panel layout component.

use leptos::prelude::*;

use crate::chat::{ChatPhase, Message};

use super::{ChatHeader, ChatInputArea, ChatMessageList};

/// Complete chat panel: header, message list and input bar.
///
/// # Example
///
/// ```rust,ignore
/// view! {
///     <ChatShell
///         session_id=session.id().to_string()
///         messages=session.snapshot()
///         phase=session.phase()
///     />
/// }
/// ```
#[component]
pub fn ChatShell(
    /// Session shown in this panel.
    session_id: String,
    /// Messages at render time.
    messages: Vec<Message>,
    /// Phase at render time.
    phase: ChatPhase,
) -> impl IntoView {
    view! {
        <section class="chat-container">
            <ChatHeader phase=phase />
            <ChatMessageList session_id=session_id.clone() messages=messages />
            <ChatInputArea session_id=session_id />
        </section>
    }
}
