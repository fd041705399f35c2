//! Chat input area component.

use leptos::prelude::*;

use crate::ui::components::{Button, ButtonVariant, SendIcon, TextInput};

/// Draft input and send button.
///
/// Enter submits the surrounding form, same as clicking the button.
/// Nothing is swapped from the response: the updated list arrives over
/// the session's event stream.
#[component]
pub fn ChatInputArea(
    /// Session the draft is submitted to.
    session_id: String,
) -> impl IntoView {
    let send_url = format!("/chat/{session_id}/send");

    view! {
        <form
            id="chat-form"
            class="input-bar"
            hx-post=send_url
            hx-swap="none"
        >
            <TextInput name="draft" id="chat-draft" placeholder="Frage eingeben..." />
            <Button variant=ButtonVariant::Primary submit=true>
                <SendIcon />
                <span>"Senden"</span>
            </Button>
        </form>
    }
}
