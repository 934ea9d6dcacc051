//! WebSocket progress messages for translation jobs.
//!
//! Each state entry produces one [`JobEvent`]; the API broadcasts its JSON
//! form as a text frame. `message` is the human-readable line shown to users.

use serde::Serialize;

use crate::job::JobState;
use crate::types::SessionId;

/// Upload accepted, job scheduled.
pub const MSG_TYPE_JOB_RECEIVED: &str = "job_received";

/// Job moved to `Reading` or `Translating`.
pub const MSG_TYPE_JOB_PROGRESS: &str = "job_progress";

/// Job completed successfully.
pub const MSG_TYPE_JOB_COMPLETED: &str = "job_completed";

/// Job failed with an error.
pub const MSG_TYPE_JOB_FAILED: &str = "job_failed";

/// A single progress notification.
#[derive(Debug, Clone, Serialize)]
pub struct JobEvent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub session_id: SessionId,
    pub state: JobState,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_file: Option<String>,
}

impl JobEvent {
    pub fn received(session_id: SessionId, file_name: &str) -> Self {
        Self::new(
            MSG_TYPE_JOB_RECEIVED,
            session_id,
            JobState::Received,
            format!("File uploaded: {file_name}. Starting translation."),
        )
    }

    pub fn reading(session_id: SessionId) -> Self {
        Self::new(
            MSG_TYPE_JOB_PROGRESS,
            session_id,
            JobState::Reading,
            "Reading file content...".to_string(),
        )
    }

    pub fn translating(session_id: SessionId) -> Self {
        Self::new(
            MSG_TYPE_JOB_PROGRESS,
            session_id,
            JobState::Translating,
            "Translating file content...".to_string(),
        )
    }

    pub fn completed(session_id: SessionId, translated_file: &str) -> Self {
        let mut event = Self::new(
            MSG_TYPE_JOB_COMPLETED,
            session_id,
            JobState::Completed,
            format!("Translation completed: {translated_file}"),
        );
        event.translated_file = Some(translated_file.to_string());
        event
    }

    pub fn failed(session_id: SessionId, reason: &str) -> Self {
        Self::new(
            MSG_TYPE_JOB_FAILED,
            session_id,
            JobState::Failed,
            format!("Translation failed: {reason}"),
        )
    }

    /// JSON text frame payload.
    pub fn to_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    fn new(kind: &'static str, session_id: SessionId, state: JobState, message: String) -> Self {
        Self {
            kind,
            session_id,
            state,
            message,
            translated_file: None,
        }
    }
}
