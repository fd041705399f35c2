//! Wire types for the query and ingestion endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST /run_query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question, exactly as the user typed it.
    pub query: String,
}

/// Body returned by `POST /run_query`.
///
/// Only `content` is required; any other field is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Answer text for the assistant message.
    pub content: String,
}

/// Body of `POST /ingest/link`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRequest {
    /// Absolute `http`/`https` URL to crawl.
    pub url: String,
}

/// Status payload returned by every ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStatus {
    /// Short machine-readable state, e.g. `queued` or `done`.
    pub status: String,
    /// Optional human-readable detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IngestStatus {
    /// Text for the sidebar status display.
    #[must_use]
    pub fn summary(&self) -> String {
        match &self.message {
            Some(message) if !message.trim().is_empty() => format!("{}: {message}", self.status),
            _ => self.status.clone(),
        }
    }
}

/// A PDF file to forward to the ingestion endpoint.
#[derive(Debug, Clone)]
pub struct PdfUpload {
    /// Original file name from the browser.
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}
