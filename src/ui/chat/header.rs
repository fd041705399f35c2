//! Chat header component.

use leptos::prelude::*;

use crate::chat::ChatPhase;
use crate::ui::components::{Badge, BadgeVariant};

/// Label for the status badge.
#[must_use]
pub fn phase_label(phase: ChatPhase) -> String {
    match phase {
        ChatPhase::Idle => "Bereit".to_string(),
        ChatPhase::Sending { in_flight: 1 } => "Antwort wird geladen".to_string(),
        ChatPhase::Sending { in_flight } => format!("{in_flight} Antworten ausstehend"),
    }
}

/// Chat title with a status badge that `chat.js` keeps up to date.
#[component]
pub fn ChatHeader(
    /// Phase at render time.
    phase: ChatPhase,
) -> impl IntoView {
    let variant = if phase.is_idle() {
        BadgeVariant::Default
    } else {
        BadgeVariant::Busy
    };

    view! {
        <header class="chat-header">
            <h2 class="titleChat">"Chat"</h2>
            <Badge variant=variant id="chat-status">
                {phase_label(phase)}
            </Badge>
        </header>
    }
}
