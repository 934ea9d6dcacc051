pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{download, history, upload};
use crate::state::AppState;
use crate::ws;

/// Build the translation route tree.
///
/// Route hierarchy:
///
/// ```text
/// /upload/                 multipart upload, schedules a job (POST)
/// /history/?session_id=    history records for a session (GET)
/// /download/{file_name}    raw artifact bytes (GET)
/// /ws/                     progress notifications (WebSocket)
/// ```
///
/// Each collection route is also reachable without the trailing slash.
pub fn translation_routes() -> Router<AppState> {
    Router::new()
        .route("/upload/", post(upload::upload_file))
        .route("/upload", post(upload::upload_file))
        .route("/history/", get(history::file_history))
        .route("/history", get(history::file_history))
        .route("/download/{file_name}", get(download::download_file))
        .route("/ws/", get(ws::ws_handler))
        .route("/ws", get(ws::ws_handler))
}
