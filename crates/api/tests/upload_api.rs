//! HTTP-level tests for upload, history, download and the WebSocket route.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use futures::StreamExt;
use polyglot_api::handlers::history::NO_HISTORY_MESSAGE;
use polyglot_core::history::ResultStatus;
use tower::ServiceExt;

use common::{
    body_bytes, body_json, build_test_app, build_test_state, frame_json, get, upload_request,
    wait_for_history, StubMode, StubTranslator,
};

// ---------------------------------------------------------------------------
// Upload: happy path through history and download
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_txt_is_accepted_translated_and_downloadable() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_test_state(dir.path(), StubTranslator::replying("bonjour")).await;
    let history = state.history.clone();
    let app = build_test_app(state);

    let response = app
        .clone()
        .oneshot(upload_request(Some(("notes.txt", b"hello")), Some("fr")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["message"], "File uploaded successfully.");
    let session_id: uuid::Uuid = json["data"]["session_id"].as_str().unwrap().parse().unwrap();

    let records = wait_for_history(&history, session_id).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].result, ResultStatus::Success);
    let translated = records[0].translated_file.clone().unwrap();
    assert_eq!(translated, format!("notes_{session_id}.translated.txt"));

    // History endpoint returns the record.
    let response = app
        .clone()
        .oneshot(get(&format!("/history/?session_id={session_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["file_name"], "notes.txt");
    assert_eq!(json["data"][0]["translated_file"], translated);
    assert_eq!(json["data"][0]["language"], "fr");
    assert_eq!(json["data"][0]["result"], "Success");
    assert!(json.get("message").is_none());

    // Download returns the translated bytes as an attachment.
    let response = app
        .clone()
        .oneshot(get(&format!("/download/{translated}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains(&translated));
    assert_eq!(body_bytes(response).await, b"bonjour");

    // The uploaded source is downloadable too.
    let response = app
        .oneshot(get(&format!("/download/notes_{session_id}.txt")))
        .await
        .unwrap();
    assert_eq!(body_bytes(response).await, b"hello");
}

#[tokio::test]
async fn upload_without_trailing_slash_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_test_state(dir.path(), StubTranslator::replying("hallo")).await;
    let app = build_test_app(state);

    let mut request = upload_request(Some(("a.txt", b"hi")), Some("de"));
    *request.uri_mut() = "/upload".parse().unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn failed_translation_is_recorded_as_failed() {
    let dir = tempfile::tempdir().unwrap();
    let state =
        build_test_state(dir.path(), StubTranslator::with_mode(StubMode::HttpError(500))).await;
    let history = state.history.clone();
    let app = build_test_app(state);

    let response = app
        .oneshot(upload_request(Some(("notes.txt", b"hello")), Some("fr")))
        .await
        .unwrap();
    let json = body_json(response).await;
    let session_id: uuid::Uuid = json["data"]["session_id"].as_str().unwrap().parse().unwrap();

    let records = wait_for_history(&history, session_id).await;
    assert_eq!(records[0].result, ResultStatus::Failed);
    assert_eq!(records[0].translated_file, None);
}

// ---------------------------------------------------------------------------
// Upload: validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_txt_upload_is_rejected_without_broadcast() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_test_state(dir.path(), StubTranslator::replying("unused")).await;
    let mut rx = state.ws_manager.register("observer".to_string()).await;
    let app = build_test_app(state);

    let response = app
        .oneshot(upload_request(Some(("report.pdf", b"%PDF")), Some("fr")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Only .txt files are allowed.");
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn missing_language_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_test_state(dir.path(), StubTranslator::replying("unused")).await;
    let app = build_test_app(state);

    let response = app
        .oneshot(upload_request(Some(("notes.txt", b"hello")), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_test_state(dir.path(), StubTranslator::replying("unused")).await;
    let app = build_test_app(state);

    let response = app.oneshot(upload_request(None, Some("fr"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing 'file' field");
}

#[tokio::test]
async fn oversized_upload_is_payload_too_large() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_test_state(dir.path(), StubTranslator::replying("unused")).await;
    let limit = state.config.max_upload_bytes;
    let app = build_test_app(state);

    let contents = vec![b'a'; 2 * limit];
    let response = app
        .oneshot(upload_request(Some(("big.txt", contents.as_slice())), Some("fr")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(
        json["error"],
        format!("File exceeds the {limit} byte upload limit.")
    );
    assert!(std::fs::read_dir(dir.path().join("uploads"))
        .unwrap()
        .next()
        .is_none());
}

#[tokio::test]
async fn upload_announces_job_to_subscribers() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_test_state(dir.path(), StubTranslator::replying("bonjour")).await;
    let history = state.history.clone();
    let mut rx = state.ws_manager.register("observer".to_string()).await;
    let app = build_test_app(state);

    let response = app
        .oneshot(upload_request(Some(("notes.txt", b"hello")), Some("fr")))
        .await
        .unwrap();
    let json = body_json(response).await;
    let session_id: uuid::Uuid = json["data"]["session_id"].as_str().unwrap().parse().unwrap();
    wait_for_history(&history, session_id).await;

    let mut frames = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        frames.push(frame_json(msg));
    }
    let states: Vec<&str> = frames.iter().map(|f| f["state"].as_str().unwrap()).collect();
    assert_eq!(states, ["received", "reading", "translating", "completed"]);
    assert_eq!(
        frames[0]["message"],
        "File uploaded: notes.txt. Starting translation."
    );
    assert!(frames
        .iter()
        .all(|f| f["session_id"] == session_id.to_string()));
}

// ---------------------------------------------------------------------------
// History and download edge cases
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_session_history_is_empty_with_message() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_test_state(dir.path(), StubTranslator::replying("unused")).await;
    let app = build_test_app(state);

    let response = app
        .oneshot(get(&format!("/history/?session_id={}", uuid::Uuid::new_v4())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!([]));
    assert_eq!(json["message"], NO_HISTORY_MESSAGE);
}

#[tokio::test]
async fn non_uuid_session_id_has_no_history() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_test_state(dir.path(), StubTranslator::replying("unused")).await;
    let app = build_test_app(state);

    let response = app
        .oneshot(get("/history/?session_id=abc123"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!([]));
    assert_eq!(json["message"], NO_HISTORY_MESSAGE);
}

#[tokio::test]
async fn missing_session_id_is_a_json_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_test_state(dir.path(), StubTranslator::replying("unused")).await;
    let app = build_test_app(state);

    let response = app.oneshot(get("/history/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "Missing 'session_id' query parameter");
}

#[tokio::test]
async fn download_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_test_state(dir.path(), StubTranslator::replying("unused")).await;
    let app = build_test_app(state);

    let response = app.oneshot(get("/download/nope.txt")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "File not found.");
}

#[tokio::test]
async fn download_rejects_path_traversal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("secret.txt"), b"top secret").unwrap();
    let state = build_test_state(dir.path(), StubTranslator::replying("unused")).await;
    let app = build_test_app(state);

    let response = app
        .oneshot(get("/download/..%2Fsecret.txt"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok_without_database() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_test_state(dir.path(), StubTranslator::replying("unused")).await;
    let app = build_test_app(state);

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], serde_json::Value::Null);
    assert_eq!(json["ws_connections"], 0);
}

// ---------------------------------------------------------------------------
// WebSocket end to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn websocket_client_receives_job_progress() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_test_state(dir.path(), StubTranslator::replying("bonjour")).await;
    let ws_manager = state.ws_manager.clone();
    let app = build_test_app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_app = app.clone();
    tokio::spawn(async move {
        axum::serve(listener, server_app).await.unwrap();
    });

    let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws/"))
        .await
        .unwrap();

    // Registration happens after the upgrade completes on the server side.
    for _ in 0..100 {
        if ws_manager.connection_count().await == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(ws_manager.connection_count().await, 1);

    let response = app
        .oneshot(upload_request(Some(("notes.txt", b"hello")), Some("fr")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let mut states = Vec::new();
    while states.last().map(String::as_str) != Some("completed") {
        let frame = tokio::time::timeout(Duration::from_secs(2), socket.next())
            .await
            .expect("timed out waiting for a frame")
            .unwrap()
            .unwrap();
        if let tokio_tungstenite::tungstenite::Message::Text(text) = frame {
            let json: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
            states.push(json["state"].as_str().unwrap().to_string());
        }
    }
    assert_eq!(states, ["received", "reading", "translating", "completed"]);

    socket.close(None).await.unwrap();
    for _ in 0..100 {
        if ws_manager.connection_count().await == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(ws_manager.connection_count().await, 0);
}
