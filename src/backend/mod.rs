//! Clients for the external query and ingestion service.
//!
//! The service owns everything document related (embedding, vector index,
//! crawling). This module only speaks its HTTP contract:
//!
//! - `POST /run_query` with `{"query": ...}`, answering `{"content": ...}`
//! - `POST /ingest/pdf` (multipart), `POST /ingest/link` (`{"url": ...}`)
//!   and `POST /index/rebuild`, each answering an [`IngestStatus`]
//!
//! The traits exist so the server can be driven by in-process fakes in tests.

mod client;
mod error;
mod types;

pub use client::{BackendSettings, HttpBackend};
pub use error::BackendError;
pub use types::{IngestStatus, LinkRequest, PdfUpload, QueryRequest, QueryResponse};

use url::Url;

/// Answers chat queries.
#[async_trait::async_trait]
pub trait QueryBackend: Send + Sync + std::fmt::Debug {
    /// Send one query and wait for its answer.
    async fn run_query(&self, query: &str) -> Result<QueryResponse, BackendError>;
}

/// Adds sources to the retrieval index.
#[async_trait::async_trait]
pub trait IngestBackend: Send + Sync + std::fmt::Debug {
    /// Store a PDF document.
    async fn ingest_pdf(&self, upload: PdfUpload) -> Result<IngestStatus, BackendError>;

    /// Crawl and store a web page.
    async fn ingest_link(&self, url: &Url) -> Result<IngestStatus, BackendError>;

    /// Rebuild the vector index from stored sources.
    async fn rebuild_index(&self) -> Result<IngestStatus, BackendError>;
}
