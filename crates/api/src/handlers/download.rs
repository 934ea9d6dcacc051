use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /download/{file_name}
///
/// Return the raw bytes of a stored artifact as an attachment.
pub async fn download_file(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let bytes = state.artifacts.read(&file_name).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}
