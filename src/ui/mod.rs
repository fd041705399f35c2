//! Leptos SSR views.
//!
//! # Structure
//!
//! - [`app`]: page shell and header
//! - [`sidebar`]: data-source sidebar and its status line
//! - [`chat`]: chat panel
//! - [`components`]: small reusable pieces
//!
//! Views are rendered to strings on the server; the `render_*` helpers
//! below are what the HTTP handlers call.

pub mod app;
pub mod chat;
pub mod components;
pub mod sidebar;

use leptos::prelude::*;

use crate::chat::{ChatPhase, Message};

use self::app::{AppShell, PageOptions};
use self::chat::MessageItems;
use self::sidebar::{IngestNotice, IngestStatusView};

/// Render a view to an HTML string.
pub fn render<F, V>(build: F) -> String
where
    F: FnOnce() -> V,
    V: IntoView,
{
    let owner = Owner::new();
    owner.with(|| build().to_html())
}

/// Full page for a freshly created session.
pub fn render_page(
    options: PageOptions,
    session_id: String,
    messages: Vec<Message>,
    phase: ChatPhase,
) -> String {
    let body = render(move || {
        view! {
            <AppShell options=options session_id=session_id messages=messages phase=phase />
        }
    });
    format!("<!DOCTYPE html>{body}")
}

/// Contents of `#chat-messages`.
pub fn render_messages(messages: Vec<Message>) -> String {
    render(move || view! { <MessageItems messages=messages /> })
}

/// Replacement for `#ingest-status`.
pub fn render_ingest_status(notice: IngestNotice) -> String {
    render(move || view! { <IngestStatusView notice=notice /> })
}
