//! Page shell.

use leptos::prelude::*;

use crate::chat::{ChatPhase, Message};
use crate::ui::chat::ChatShell;
use crate::ui::components::SparklesIcon;
use crate::ui::sidebar::Sidebar;

/// Page-level settings.
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Document title and header text.
    pub title: String,
    /// Where to load htmx from.
    pub htmx_src: String,
    /// Whether the sidebar forms are wired up.
    pub ingestion_enabled: bool,
}

/// The whole page: header, then sidebar and chat side by side.
#[component]
pub fn AppShell(
    options: PageOptions,
    session_id: String,
    messages: Vec<Message>,
    phase: ChatPhase,
) -> impl IntoView {
    let PageOptions {
        title,
        htmx_src,
        ingestion_enabled,
    } = options;

    view! {
        <html lang="de">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <title>{title.clone()}</title>
                <script src=htmx_src></script>
                <script defer src="/static/chat.js"></script>
                <link rel="stylesheet" href="/static/app.css"/>
            </head>
            <body>
                <div id="root">
                    <Header title=title />
                    <div class="content-wrapper">
                        <Sidebar ingestion_enabled=ingestion_enabled />
                        <ChatShell session_id=session_id messages=messages phase=phase />
                    </div>
                </div>
            </body>
        </html>
    }
}

/// Application header.
#[component]
pub fn Header(title: String) -> impl IntoView {
    view! {
        <header class="app-header">
            <a href="/" class="brand">
                <SparklesIcon class="h-5 w-5" />
                <span>{title}</span>
            </a>
        </header>
    }
}
