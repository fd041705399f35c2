//! Document Chat
//!
//! A server-rendered chat page for asking questions about uploaded
//! documents. Answers come from an external query service; this crate
//! owns the conversation state and the UI.
//!
//! # Architecture
//!
//! - **Server**: Axum routes returning HTML fragments, plus an SSE stream per page
//! - **Chat**: in-memory conversation state machine, one per page load
//! - **Backend**: HTTP client for the query and ingestion endpoints
//! - **UI**: Leptos SSR + HTMX
//!
//! # Modules
//!
//! - [`chat`]: messages, drafts and turn bookkeeping
//! - [`backend`]: query/ingestion service client
//! - [`session`]: per-page sessions and background turns
//! - [`events`]: server-sent event framing
//! - [`ui`]: Leptos views

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]
#![allow(clippy::needless_pass_by_value)]

pub mod backend;
pub mod chat;
pub mod config;
pub mod error;
pub mod events;
pub mod server;
pub mod session;
pub mod ui;

use std::sync::Arc;

use backend::{IngestBackend, QueryBackend};
use config::AppConfig;
use session::SessionStore;
use ui::app::PageOptions;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Global Configuration
    pub config: Arc<AppConfig>,
    /// Session store for conversation management.
    pub sessions: SessionStore,
    /// Answers chat queries.
    pub query: Arc<dyn QueryBackend>,
    /// Receives sidebar uploads.
    pub ingest: Arc<dyn IngestBackend>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sessions", &self.sessions.len())
            .field("query", &self.query)
            .field("ingest", &self.ingest)
            .finish()
    }
}

impl AppState {
    /// Build state with a fresh, empty session store.
    pub fn new(
        config: Arc<AppConfig>,
        query: Arc<dyn QueryBackend>,
        ingest: Arc<dyn IngestBackend>,
    ) -> Self {
        let sessions = SessionStore::new(config.chat.clone());
        Self {
            config,
            sessions,
            query,
            ingest,
        }
    }

    /// Page settings derived from the configuration.
    #[must_use]
    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            title: self.config.ui.title.clone(),
            htmx_src: self.config.ui.htmx_src.clone(),
            ingestion_enabled: self.config.sidebar.ingestion_enabled,
        }
    }
}
