//! HTTP implementation of the backend traits.

use std::time::Duration;

use reqwest::Response;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::BackendError;
use super::types::{IngestStatus, LinkRequest, PdfUpload, QueryRequest, QueryResponse};
use super::{IngestBackend, QueryBackend};

/// Longest response body kept in [`BackendError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Connection settings for [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct BackendSettings {
    /// Base URL, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Upper bound for a single call. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Talks to the query service over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpBackend {
    /// Build a client for the given settings.
    pub fn new(settings: &BackendSettings) -> Result<Self, BackendError> {
        Url::parse(&settings.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(BackendError::Transport)?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

/// Fail on non-2xx and decode the JSON body.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, BackendError> {
    let status = resp.status();
    let body = resp.text().await.map_err(BackendError::Transport)?;

    if !status.is_success() {
        let body = body.chars().take(MAX_ERROR_BODY).collect();
        return Err(BackendError::Status { status, body });
    }

    serde_json::from_str(&body).map_err(|e| BackendError::MalformedResponse(e.to_string()))
}

#[async_trait::async_trait]
impl QueryBackend for HttpBackend {
    async fn run_query(&self, query: &str) -> Result<QueryResponse, BackendError> {
        let body = QueryRequest {
            query: query.to_string(),
        };

        let resp = self
            .http
            .post(self.endpoint("run_query"))
            .json(&body)
            .send()
            .await
            .map_err(BackendError::Transport)?;

        decode(resp).await
    }
}

#[async_trait::async_trait]
impl IngestBackend for HttpBackend {
    async fn ingest_pdf(&self, upload: PdfUpload) -> Result<IngestStatus, BackendError> {
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str("application/pdf")
            .map_err(BackendError::Transport)?;
        let form = Form::new().part("file", part);

        let resp = self
            .http
            .post(self.endpoint("ingest/pdf"))
            .multipart(form)
            .send()
            .await
            .map_err(BackendError::Transport)?;

        decode(resp).await
    }

    async fn ingest_link(&self, url: &Url) -> Result<IngestStatus, BackendError> {
        let body = LinkRequest {
            url: url.to_string(),
        };

        let resp = self
            .http
            .post(self.endpoint("ingest/link"))
            .json(&body)
            .send()
            .await
            .map_err(BackendError::Transport)?;

        decode(resp).await
    }

    async fn rebuild_index(&self) -> Result<IngestStatus, BackendError> {
        let resp = self
            .http
            .post(self.endpoint("index/rebuild"))
            .send()
            .await
            .map_err(BackendError::Transport)?;

        decode(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let backend = HttpBackend::new(&BackendSettings {
            base_url: "http://localhost:8000/".into(),
            timeout: None,
        })
        .unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8000");
        assert_eq!(backend.endpoint("run_query"), "http://localhost:8000/run_query");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = HttpBackend::new(&BackendSettings {
            base_url: "not a url".into(),
            timeout: None,
        })
        .unwrap_err();
        assert!(matches!(err, BackendError::InvalidUrl(_)));
    }
}
