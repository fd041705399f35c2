//! Errors returned by HTTP handlers.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

/// Handler failure, rendered as a small HTML fragment.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The session expired or never existed, e.g. after a server restart.
    #[error("session not found: {0}")]
    SessionNotFound(String),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn user_message(&self) -> &'static str {
        match self {
            Self::SessionNotFound(_) => "Sitzung nicht gefunden. Bitte die Seite neu laden.",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Request failed");
        let body = format!(r#"<div class="error">{}</div>"#, self.user_message());
        (self.status(), Html(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_not_found_is_404() {
        let resp = ServerError::SessionNotFound("x".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
