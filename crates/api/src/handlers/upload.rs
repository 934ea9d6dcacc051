//! Upload endpoint: accept a text file and schedule its translation.

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use polyglot_core::job::TranslationJob;
use polyglot_core::job_events::JobEvent;
use polyglot_core::naming;
use polyglot_core::types::SessionId;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying the target language.
pub const LANGUAGE_FIELD: &str = "language";

/// Response body for an accepted upload.
#[derive(Debug, Serialize)]
pub struct UploadAccepted {
    pub session_id: SessionId,
    pub message: &'static str,
}

/// POST /upload/
///
/// Validate the upload, store the file, announce it, and schedule the
/// translation job. Responds before the job runs.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadAccepted>>)> {
    let mut file: Option<(String, Bytes)> = None;
    let mut language: Option<String> = None;

    let limit = state.config.max_upload_bytes;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            FILE_FIELD => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, limit))?;
                file = Some((file_name, data));
            }
            LANGUAGE_FIELD => {
                language = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| multipart_error(e, limit))?,
                );
            }
            _ => {}
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing 'file' field".to_string()))?;
    naming::validate_upload_name(&file_name)?;
    let language = naming::validate_language(language.as_deref().unwrap_or_default())?;

    let session_id = naming::new_session_id();
    let source_key = naming::source_key(session_id, &file_name);
    state.artifacts.write(&source_key, &data).await?;

    tracing::info!(
        session_id = %session_id,
        file_name = %file_name,
        language = %language,
        bytes = data.len(),
        "Upload accepted"
    );

    state
        .broadcaster
        .broadcast(JobEvent::received(session_id, &file_name).to_text())
        .await;
    state.runner.spawn(TranslationJob::new(
        session_id,
        file_name,
        source_key,
        language,
    ));

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: UploadAccepted {
                session_id,
                message: "File uploaded successfully.",
            },
        }),
    ))
}

/// Map a multipart parse failure to the matching API error.
///
/// Body-limit overruns surface from the multipart stream with a 413 status.
fn multipart_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::debug!(limit, "Upload rejected: body limit exceeded");
        AppError::PayloadTooLarge(format!("File exceeds the {limit} byte upload limit."))
    } else {
        AppError::BadRequest(err.body_text())
    }
}
