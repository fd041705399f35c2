//! `HttpBackend` against a local stand-in for the query service.

use std::time::Duration;

use axum::{
    Json, Router,
    extract::Multipart,
    http::StatusCode,
    routing::post,
};
use doc_chat::backend::{
    BackendError, BackendSettings, HttpBackend, IngestBackend, PdfUpload, QueryBackend,
};
use serde_json::{Value, json};
use url::Url;

async fn run_query(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let query = body["query"].as_str().unwrap_or_default();
    match query {
        "ohne inhalt" => (StatusCode::OK, Json(json!({ "answer": "falsches Feld" }))),
        "absturz" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "index not loaded" })),
        ),
        "langsam" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, Json(json!({ "content": "zu spät" })))
        }
        _ => (
            StatusCode::OK,
            Json(json!({ "content": format!("Antwort: {query}"), "sources": ["a.pdf"] })),
        ),
    }
}

async fn ingest_pdf(mut multipart: Multipart) -> Json<Value> {
    let field = multipart.next_field().await.unwrap().unwrap();
    let name = field.name().unwrap().to_string();
    let file_name = field.file_name().unwrap().to_string();
    let content_type = field.content_type().unwrap().to_string();
    let len = field.bytes().await.unwrap().len();
    Json(json!({
        "status": "queued",
        "message": format!("{name}:{file_name}:{content_type}:{len}"),
    }))
}

async fn ingest_link(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "status": "queued", "message": body["url"] }))
}

async fn rebuild_index() -> Json<Value> {
    Json(json!({ "status": "done" }))
}

/// Serve the stand-in on an ephemeral port and return its base URL.
async fn spawn_service() -> String {
    let app = Router::new()
        .route("/run_query", post(run_query))
        .route("/ingest/pdf", post(ingest_pdf))
        .route("/ingest/link", post(ingest_link))
        .route("/index/rebuild", post(rebuild_index));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: String, timeout: Option<Duration>) -> HttpBackend {
    HttpBackend::new(&BackendSettings { base_url, timeout }).unwrap()
}

#[tokio::test]
async fn test_run_query() {
    let backend = client(spawn_service().await, None);

    let resp = backend.run_query("Was ist X?").await.unwrap();
    assert_eq!(resp.content, "Antwort: Was ist X?");
}

#[tokio::test]
async fn test_missing_content_is_malformed() {
    let backend = client(spawn_service().await, None);

    let err = backend.run_query("ohne inhalt").await.unwrap_err();
    assert!(matches!(err, BackendError::MalformedResponse(_)), "{err:?}");
}

#[tokio::test]
async fn test_error_status_keeps_body() {
    let backend = client(spawn_service().await, None);

    match backend.run_query("absturz").await.unwrap_err() {
        BackendError::Status { status, body } => {
            assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
            assert!(body.contains("index not loaded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let backend = client(spawn_service().await, Some(Duration::from_millis(100)));

    let err = backend.run_query("langsam").await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_unreachable_service() {
    // Bind and drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = client(format!("http://{addr}"), None);
    let err = backend.run_query("Hallo").await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_ingest_endpoints() {
    let backend = client(spawn_service().await, None);

    let status = backend
        .ingest_pdf(PdfUpload {
            file_name: "handbuch.pdf".into(),
            bytes: b"%PDF-1.7".to_vec(),
        })
        .await
        .unwrap();
    assert_eq!(
        status.message.as_deref(),
        Some("file:handbuch.pdf:application/pdf:8")
    );

    let url = Url::parse("https://example.org/seite").unwrap();
    let status = backend.ingest_link(&url).await.unwrap();
    assert_eq!(status.summary(), "queued: https://example.org/seite");

    let status = backend.rebuild_index().await.unwrap();
    assert_eq!(status.summary(), "done");
}
