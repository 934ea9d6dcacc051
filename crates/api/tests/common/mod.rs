#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use polyglot_core::artifacts::{ArtifactStore, LocalArtifactStore};
use polyglot_core::history::{HistoryRecord, HistoryStore, InMemoryHistoryStore};
use polyglot_core::translation::{TranslateError, Translator};
use polyglot_core::types::SessionId;
use polyglot_translator::TranslatorConfig;

use polyglot_api::config::ServerConfig;
use polyglot_api::router::build_app_router;
use polyglot_api::state::AppState;

/// Boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "polyglot-test-boundary";

/// How a [`StubTranslator`] answers.
#[derive(Debug, Clone)]
pub enum StubMode {
    /// Return this text for every call.
    Reply(String),
    /// Return a provider HTTP error.
    HttpError(u16),
    /// Report a timeout.
    Timeout,
    /// Panic inside `translate`.
    Panic,
}

/// In-process translator with a fixed behaviour.
pub struct StubTranslator {
    mode: StubMode,
}

impl StubTranslator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            mode: StubMode::Reply(text.to_string()),
        })
    }

    pub fn with_mode(mode: StubMode) -> Arc<Self> {
        Arc::new(Self { mode })
    }
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(&self, _text: &str, _target_language: &str) -> Result<String, TranslateError> {
        match &self.mode {
            StubMode::Reply(text) => Ok(text.clone()),
            StubMode::HttpError(status) => Err(TranslateError::HttpStatus {
                status: *status,
                body: "upstream unavailable".to_string(),
            }),
            StubMode::Timeout => Err(TranslateError::Timeout),
            StubMode::Panic => panic!("stub translator exploded"),
        }
    }
}

/// Build a test `ServerConfig` rooted at `dir`.
pub fn test_config(dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        upload_dir: dir.join("uploads"),
        static_dir: dir.join("static"),
        max_upload_bytes: 1024 * 1024,
        database_url: None,
        translator: TranslatorConfig::for_url("http://127.0.0.1:9/translate"),
    }
}

/// Build an `AppState` backed by a local artifact directory under `dir`
/// and an in-memory history store.
pub async fn build_test_state(dir: &Path, translator: Arc<dyn Translator>) -> AppState {
    let config = test_config(dir);
    let store = LocalArtifactStore::new(&config.upload_dir);
    store.ensure_root().await.unwrap();
    let artifacts: Arc<dyn ArtifactStore> = Arc::new(store);
    let history: Arc<dyn HistoryStore> = Arc::new(InMemoryHistoryStore::new());
    AppState::new(config, artifacts, translator, history, None)
}

/// Build the full application router on top of `state`.
///
/// Uses the same builder as `main.rs` so tests exercise the production
/// middleware stack.
pub fn build_test_app(state: AppState) -> Router {
    let config = state.config.as_ref().clone();
    build_app_router(state, &config)
}

/// Encode a multipart/form-data body with an optional file part and an
/// optional language part.
pub fn multipart_body(file: Option<(&str, &[u8])>, language: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some((file_name, contents)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: text/plain\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(language) = language {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"language\"\r\n\r\n{language}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST a multipart upload request.
pub fn upload_request(file: Option<(&str, &[u8])>, language: Option<&str>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload/")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(file, language)))
        .unwrap()
}

/// Build a GET request.
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Collect a response body as bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Poll `history` until `session_id` has at least one record, or panic
/// after two seconds.
pub async fn wait_for_history(
    history: &Arc<dyn HistoryStore>,
    session_id: SessionId,
) -> Vec<HistoryRecord> {
    for _ in 0..200 {
        let records = history.query_by_session(session_id).await.unwrap();
        if !records.is_empty() {
            return records;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("no history recorded for session {session_id}");
}

/// Decode a broadcast text frame.
pub fn frame_json(message: axum::extract::ws::Message) -> serde_json::Value {
    match message {
        axum::extract::ws::Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
        other => panic!("expected a text frame, got {other:?}"),
    }
}
