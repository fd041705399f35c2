//! Data-source sidebar.
//!
//! Three independent sections: PDF upload, link input and index status.
//! With ingestion enabled the forms post to the server, which forwards
//! them to the backend and answers with a fresh [`IngestStatusView`].
//! With ingestion disabled they render without any handler.

use std::fmt;

use leptos::prelude::*;

use crate::ui::components::{Button, ButtonVariant, FileIcon, LinkIcon, RefreshIcon, TextInput};

/// Status text shown before anything was submitted.
pub const IDLE_STATUS: &str = "Keine laufende Verarbeitung";

/// Severity of the status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoticeLevel {
    #[default]
    Idle,
    Success,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Success => "success",
            Self::Error => "error",
        })
    }
}

/// Content of the status display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestNotice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Default for IngestNotice {
    fn default() -> Self {
        Self::idle()
    }
}

impl IngestNotice {
    #[must_use]
    pub fn idle() -> Self {
        Self {
            level: NoticeLevel::Idle,
            text: IDLE_STATUS.to_string(),
        }
    }

    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// The status line. Forms swap their response over this element.
#[component]
pub fn IngestStatusView(notice: IngestNotice) -> impl IntoView {
    let class = format!("status status-{}", notice.level);

    view! {
        <div id="ingest-status" class=class role="status">
            {notice.text}
        </div>
    }
}

/// Sidebar with upload, link and status sections.
#[component]
pub fn Sidebar(
    /// Wire the forms to the ingestion routes.
    ingestion_enabled: bool,
) -> impl IntoView {
    let target = ingestion_enabled.then_some("#ingest-status");
    let swap = ingestion_enabled.then_some("outerHTML");
    let route = |path: &'static str| ingestion_enabled.then_some(path);

    view! {
        <aside class="sidebar">
            <h2>"Datenquellen"</h2>

            <form
                class="section"
                hx-post=route("/sources/pdf")
                hx-encoding=ingestion_enabled.then_some("multipart/form-data")
                hx-target=target
                hx-swap=swap
            >
                <label for="pdf-files"><FileIcon />" PDFs hochladen"</label>
                <input id="pdf-files" type="file" name="files" accept="application/pdf" multiple=true />
                <Button submit=ingestion_enabled>"In VektorDB speichern"</Button>
            </form>

            <form
                class="section"
                hx-post=route("/sources/link")
                hx-target=target
                hx-swap=swap
            >
                <label for="link-url"><LinkIcon />" Link hinzufügen"</label>
                <TextInput name="url" id="link-url" placeholder="https://..." />
                <Button submit=ingestion_enabled>"Link speichern"</Button>
            </form>

            <form
                class="section"
                hx-post=route("/index/rebuild")
                hx-target=target
                hx-swap=swap
            >
                <label>"Status"</label>
                <IngestStatusView notice=IngestNotice::idle() />
                <Button variant=ButtonVariant::Secondary submit=ingestion_enabled>
                    <RefreshIcon />
                    " Index neu aufbauen"
                </Button>
            </form>
        </aside>
    }
}
