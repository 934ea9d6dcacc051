use axum::extract::{Query, State};
use axum::Json;
use polyglot_core::history::HistoryRecord;
use polyglot_core::types::SessionId;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Message returned alongside an empty result set.
pub const NO_HISTORY_MESSAGE: &str = "No history found for this session ID.";

/// Query string for [`file_history`].
///
/// The id is taken as a raw string: any value a client holds is a valid
/// lookup, and one that was never issued simply has no history.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub session_id: Option<String>,
}

/// `{ "data": [...] }`, plus `message` when `data` is empty.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub data: Vec<HistoryRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl HistoryResponse {
    fn empty() -> Self {
        Self {
            data: Vec::new(),
            message: Some(NO_HISTORY_MESSAGE),
        }
    }
}

/// GET /history/?session_id=...
pub async fn file_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<HistoryResponse>> {
    let raw = params
        .session_id
        .ok_or_else(|| AppError::BadRequest("Missing 'session_id' query parameter".to_string()))?;

    let Ok(session_id) = raw.trim().parse::<SessionId>() else {
        tracing::debug!(session_id = %raw, "History lookup for an id that was never issued");
        return Ok(Json(HistoryResponse::empty()));
    };

    let data = state.history.query_by_session(session_id).await?;
    if data.is_empty() {
        return Ok(Json(HistoryResponse::empty()));
    }
    Ok(Json(HistoryResponse {
        data,
        message: None,
    }))
}
