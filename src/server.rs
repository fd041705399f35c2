//! HTTP routes and server startup.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response, sse::Event},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use url::Url;

use crate::AppState;
use crate::backend::{HttpBackend, IngestStatus, PdfUpload};
use crate::chat::Message;
use crate::config::AppConfig;
use crate::error::ServerError;
use crate::events::{ChatEvent, build_sse_response};
use crate::session::{ChatSession, spawn_turn};
use crate::ui::sidebar::IngestNotice;
use crate::ui::{render_ingest_status, render_messages, render_page};

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let backend = Arc::new(HttpBackend::new(&config.backend.settings())?);

    info!(
        name: "backend.config.loaded",
        base_url = %backend.base_url(),
        timeout_secs = ?config.backend.timeout_secs,
        "Query backend configured"
    );

    let state = AppState::new(
        Arc::clone(&config),
        Arc::<HttpBackend>::clone(&backend),
        backend,
    );

    let _sweeper = state.sessions.spawn_sweeper(
        config.sessions.sweep_interval(),
        config.sessions.idle_timeout(),
    );

    let app = build_router(state);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// All routes, with tracing and the upload limit applied.
pub fn build_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.ui.assets_dir);
    let body_limit = state.config.server.max_upload_bytes();

    Router::new()
        .route("/", get(index_handler))
        .route("/chat/{id}/send", post(send_handler))
        .route("/chat/{id}/messages", get(messages_fragment))
        .route("/chat/{id}/events", get(chat_events))
        .route("/api/sessions/{id}/messages", get(api_get_messages))
        .route("/sources/pdf", post(upload_pdfs))
        .route("/sources/link", post(add_link))
        .route("/index/rebuild", post(rebuild_index))
        .nest_service("/static", assets)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────────────────────────────────────

fn session_or_404(state: &AppState, id: &str) -> Result<ChatSession, ServerError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| ServerError::SessionNotFound(id.to_string()))
}

/// GET / - New session, full page.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let session = state.sessions.create();
    info!(
        name: "session.created",
        session_id = %session.id(),
        active_sessions = state.sessions.len(),
        "Chat session created"
    );

    let (messages, phase) = session.view();
    Html(render_page(
        state.page_options(),
        session.id().to_string(),
        messages,
        phase,
    ))
}

/// Form body of the send route.
#[derive(Debug, Deserialize)]
struct SendForm {
    #[serde(default)]
    draft: String,
}

/// POST /chat/:id/send - Submit the draft.
///
/// Blank drafts answer `204` and change nothing. Otherwise the user
/// message is appended, the backend call starts in the background and
/// an empty `200` is returned. The list itself reaches the page over the
/// event stream, so a late response can never overwrite a newer list.
async fn send_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<SendForm>,
) -> Result<Response, ServerError> {
    let session = session_or_404(&state, &id)?;

    let Some(turn) = session.submit(form.draft) else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    info!(
        name: "chat.turn.submitted",
        session_id = %session.id(),
        turn = %turn.id,
        query_length = turn.query.len(),
        "Query submitted"
    );

    spawn_turn(session, turn, Arc::clone(&state.query));

    Ok(StatusCode::OK.into_response())
}

/// GET /chat/:id/messages - Message list fragment.
async fn messages_fragment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ServerError> {
    let session = session_or_404(&state, &id)?;
    Ok(Html(render_messages(session.snapshot())))
}

/// GET /api/sessions/:id/messages - Message list as JSON.
async fn api_get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Message>>, ServerError> {
    let session = session_or_404(&state, &id)?;
    Ok(Json(session.snapshot()))
}

/// Current list and phase as a pair of SSE events.
fn snapshot_events(session: &ChatSession) -> [Event; 2] {
    let (messages, phase) = session.view();
    let html = render_messages(messages);
    [
        ChatEvent::Messages { html }.into(),
        ChatEvent::Status(phase.into()).into(),
    ]
}

/// GET /chat/:id/events - Live updates for an open page.
///
/// Sends the current snapshot, then a fresh one after every change. The
/// stream ends once the sweeper has dropped the session.
async fn chat_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let session = session_or_404(&state, &id)?;
    let sessions = state.sessions.clone();
    let keep_alive = state.config.sessions.keep_alive();

    let mut changes = session.subscribe();
    drop(changes.borrow_and_update());

    tracing::debug!(session_id = %session.id(), "Event stream opened");

    let stream = async_stream::stream! {
        for event in snapshot_events(&session) {
            yield Ok::<Event, Infallible>(event);
        }

        let mut ticker = tokio::time::interval(keep_alive);
        ticker.tick().await;

        loop {
            let changed = tokio::select! {
                changed = changes.changed() => Some(changed.is_ok()),
                _ = ticker.tick() => None,
            };
            match changed {
                Some(true) => {
                    for event in snapshot_events(&session) {
                        yield Ok(event);
                    }
                }
                Some(false) => break,
                None => {
                    if !sessions.contains(session.id()) {
                        break;
                    }
                    session.touch();
                }
            }
        }

        tracing::debug!(
            session_id = %session.id(),
            session_age_secs = session.age().as_secs(),
            "Event stream closed"
        );
    };

    Ok(build_sse_response(stream, keep_alive).into_response())
}

// ─────────────────────────────────────────────────────────────────────────────
// Sidebar
// ─────────────────────────────────────────────────────────────────────────────

fn status_fragment(notice: IngestNotice) -> Html<String> {
    Html(render_ingest_status(notice))
}

fn forwarded(kind: &'static str, result: &Result<IngestStatus, crate::backend::BackendError>) {
    match result {
        Ok(status) => info!(
            name: "ingest.forwarded",
            kind,
            status = %status.status,
            "Ingestion request accepted"
        ),
        Err(e) => warn!(
            name: "ingest.failed",
            kind,
            error = %e,
            "Ingestion request failed"
        ),
    }
}

fn is_pdf(file_name: &str, content_type: Option<&str>) -> bool {
    content_type == Some("application/pdf")
        || mime_guess::from_path(file_name).first_raw() == Some("application/pdf")
}

/// POST /sources/pdf - Forward uploaded PDFs one by one.
async fn upload_pdfs(State(state): State<AppState>, mut multipart: Multipart) -> Html<String> {
    let mut lines = Vec::new();
    let mut failed = false;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Failed to read multipart field");
                return status_fragment(IngestNotice::error(format!(
                    "Upload fehlgeschlagen: {e}"
                )));
            }
        };

        if field.name() != Some("files") {
            continue;
        }
        // An empty file input still sends one part without a name.
        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            continue;
        }

        if !is_pdf(&file_name, field.content_type()) {
            failed = true;
            lines.push(format!("{file_name}: keine PDF-Datei"));
            continue;
        }

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                failed = true;
                lines.push(format!("{file_name}: {e}"));
                continue;
            }
        };

        let result = state
            .ingest
            .ingest_pdf(PdfUpload {
                file_name: file_name.clone(),
                bytes: bytes.to_vec(),
            })
            .await;
        forwarded("pdf", &result);

        match result {
            Ok(status) => lines.push(format!("{file_name}: {}", status.summary())),
            Err(e) => {
                failed = true;
                lines.push(format!("{file_name}: {e}"));
            }
        }
    }

    if lines.is_empty() {
        return status_fragment(IngestNotice::error("Keine PDF-Datei ausgewählt"));
    }

    let text = lines.join("; ");
    status_fragment(if failed {
        IngestNotice::error(text)
    } else {
        IngestNotice::success(text)
    })
}

/// Form body of the link route.
#[derive(Debug, Deserialize)]
struct LinkForm {
    #[serde(default)]
    url: String,
}

/// Validate a link typed into the sidebar.
pub fn parse_link(raw: &str) -> Result<Url, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Bitte einen Link eingeben");
    }
    let Ok(url) = Url::parse(raw) else {
        return Err("Ungültiger Link");
    };
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err("Nur http- und https-Links werden unterstützt"),
    }
}

/// POST /sources/link - Forward a link for crawling.
async fn add_link(State(state): State<AppState>, Form(form): Form<LinkForm>) -> Html<String> {
    let url = match parse_link(&form.url) {
        Ok(url) => url,
        Err(reason) => return status_fragment(IngestNotice::error(reason)),
    };

    let result = state.ingest.ingest_link(&url).await;
    forwarded("link", &result);

    status_fragment(match result {
        Ok(status) => IngestNotice::success(format!("{url}: {}", status.summary())),
        Err(e) => IngestNotice::error(format!("{url}: {e}")),
    })
}

/// POST /index/rebuild - Ask the backend to rebuild its index.
async fn rebuild_index(State(state): State<AppState>) -> Html<String> {
    let result = state.ingest.rebuild_index().await;
    forwarded("rebuild", &result);

    status_fragment(match result {
        Ok(status) => IngestNotice::success(status.summary()),
        Err(e) => IngestNotice::error(format!("Index konnte nicht neu aufgebaut werden: {e}")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_link() {
        assert!(parse_link("https://example.org/doc").is_ok());
        assert!(parse_link("  http://example.org  ").is_ok());
        assert_eq!(parse_link("   "), Err("Bitte einen Link eingeben"));
        assert_eq!(parse_link("kein link"), Err("Ungültiger Link"));
        assert_eq!(
            parse_link("ftp://example.org/file"),
            Err("Nur http- und https-Links werden unterstützt")
        );
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf("a.pdf", Some("application/pdf")));
        assert!(is_pdf("a.pdf", Some("application/octet-stream")));
        assert!(is_pdf("scan", Some("application/pdf")));
        assert!(!is_pdf("notes.txt", Some("text/plain")));
    }

    #[tokio::test]
    async fn test_static_assets_are_served() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let config = Arc::new(AppConfig::default());
        let backend = Arc::new(HttpBackend::new(&config.backend.settings()).unwrap());
        let state = AppState::new(config, Arc::<HttpBackend>::clone(&backend), backend);
        let app = build_router(state);

        let resp = app
            .oneshot(Request::get("/static/chat.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        // The draft is cleared when the send starts, not after it returns.
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let script = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(script.contains("htmx:beforeRequest"));
        assert!(!script.contains("form.reset()"));
    }
}
