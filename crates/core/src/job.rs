//! Translation job state machine.
//!
//! ```text
//! Received --> Reading --> Translating --> Completed
//!                 |             |
//!                 +--> Failed <-+
//! ```
//!
//! Transitions are strictly sequential. A job is owned by the single runner
//! executing it, so the state lives in a plain struct without locking.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::SessionId;

/// Lifecycle state of a translation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Received,
    Reading,
    Translating,
    Completed,
    Failed,
}

impl JobState {
    /// Lowercase name used in log fields and event payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Reading => "reading",
            Self::Translating => "translating",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// `true` for `Completed` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition_to(self, next: JobState) -> bool {
        matches!(
            (self, next),
            (Self::Received, Self::Reading)
                | (Self::Reading, Self::Translating)
                | (Self::Reading, Self::Failed)
                | (Self::Translating, Self::Completed)
                | (Self::Translating, Self::Failed)
        )
    }
}

/// One upload-to-translation unit of work.
#[derive(Debug, Clone)]
pub struct TranslationJob {
    pub session_id: SessionId,
    /// File name as uploaded by the client, e.g. `notes.txt`.
    pub original_file_name: String,
    /// Storage key of the uploaded content.
    pub source_key: String,
    pub target_language: String,
    state: JobState,
    result_key: Option<String>,
    failure_reason: Option<String>,
}

impl TranslationJob {
    /// Create a job in the `Received` state.
    pub fn new(
        session_id: SessionId,
        original_file_name: impl Into<String>,
        source_key: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            session_id,
            original_file_name: original_file_name.into(),
            source_key: source_key.into(),
            target_language: target_language.into(),
            state: JobState::Received,
            result_key: None,
            failure_reason: None,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Storage key of the translated artifact; set only once `Completed`.
    pub fn result_key(&self) -> Option<&str> {
        self.result_key.as_deref()
    }

    /// Captured error message; set only once `Failed`.
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// Move to a non-terminal state.
    ///
    /// Terminal states must go through [`complete`](Self::complete) or
    /// [`fail`](Self::fail) so their payload is recorded.
    pub fn advance(&mut self, next: JobState) -> Result<(), CoreError> {
        if next.is_terminal() {
            return Err(CoreError::Conflict(format!(
                "terminal state '{}' requires complete() or fail()",
                next.as_str()
            )));
        }
        self.transition(next)
    }

    /// Enter `Completed` with the key of the written output artifact.
    pub fn complete(&mut self, result_key: impl Into<String>) -> Result<(), CoreError> {
        self.transition(JobState::Completed)?;
        self.result_key = Some(result_key.into());
        Ok(())
    }

    /// Enter `Failed`, capturing the reason.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), CoreError> {
        self.transition(JobState::Failed)?;
        self.failure_reason = Some(reason.into());
        Ok(())
    }

    fn transition(&mut self, next: JobState) -> Result<(), CoreError> {
        if !self.state.can_transition_to(next) {
            return Err(CoreError::Conflict(format!(
                "invalid job transition {} -> {}",
                self.state.as_str(),
                next.as_str()
            )));
        }
        self.state = next;
        Ok(())
    }
}
