//! Background execution of translation jobs.
//!
//! [`JobRunner::run`] drives one [`TranslationJob`] from `Received` to a
//! terminal state, broadcasting each state entry and appending exactly one
//! history record at the end. Nothing it does can fail the caller: every
//! error, and a panic inside the job body, becomes the `Failed` transition.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use polyglot_core::artifacts::{ArtifactError, ArtifactStore};
use polyglot_core::error::CoreError;
use polyglot_core::history::{HistoryStore, NewHistoryRecord, ResultStatus};
use polyglot_core::job::TranslationJob;
use polyglot_core::job_events::JobEvent;
use polyglot_core::naming;
use polyglot_core::translation::{TranslateError, Translator};
use tracing::Instrument;

use crate::ws::Broadcaster;

/// Everything that can end a job in `Failed`.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("Source file '{0}' is not valid UTF-8")]
    Encoding(String),

    #[error(transparent)]
    Translation(#[from] TranslateError),

    #[error(transparent)]
    State(#[from] CoreError),

    #[error("Job aborted unexpectedly")]
    Panicked,
}

/// Runs translation jobs against the configured collaborators.
pub struct JobRunner {
    artifacts: Arc<dyn ArtifactStore>,
    translator: Arc<dyn Translator>,
    history: Arc<dyn HistoryStore>,
    broadcaster: Arc<Broadcaster>,
}

impl JobRunner {
    pub fn new(
        artifacts: Arc<dyn ArtifactStore>,
        translator: Arc<dyn Translator>,
        history: Arc<dyn HistoryStore>,
        broadcaster: Arc<Broadcaster>,
    ) -> Self {
        Self {
            artifacts,
            translator,
            history,
            broadcaster,
        }
    }

    /// Schedule `job` on the runtime and return immediately.
    ///
    /// No handle is returned; the outcome is observable only through
    /// broadcasts and the history store.
    pub fn spawn(self: &Arc<Self>, job: TranslationJob) {
        let runner = Arc::clone(self);
        tokio::spawn(async move { runner.run(job).await });
    }

    /// Drive `job` to a terminal state.
    pub async fn run(&self, mut job: TranslationJob) {
        let span = tracing::info_span!(
            "translation_job",
            session_id = %job.session_id,
            language = %job.target_language,
        );

        async move {
            let outcome = AssertUnwindSafe(self.execute(&mut job))
                .catch_unwind()
                .await
                .unwrap_or(Err(JobError::Panicked));

            match outcome {
                Ok(output_key) => self.finish_completed(&mut job, output_key).await,
                Err(e) => self.finish_failed(&mut job, e).await,
            }
        }
        .instrument(span)
        .await
    }

    /// Reading and Translating. Returns the key of the written output.
    async fn execute(&self, job: &mut TranslationJob) -> Result<String, JobError> {
        let session_id = job.session_id;
        self.enter(job, JobEvent::reading(session_id)).await?;
        let bytes = self.artifacts.read(&job.source_key).await?;
        let text = String::from_utf8(bytes).map_err(|_| JobError::Encoding(job.source_key.clone()))?;

        self.enter(job, JobEvent::translating(session_id)).await?;
        let translated = self
            .translator
            .translate(&text, &job.target_language)
            .await?;

        let output_key = naming::output_key(&job.source_key);
        self.artifacts
            .write(&output_key, translated.as_bytes())
            .await?;
        Ok(output_key)
    }

    /// Move `job` into the state announced by `event`, then broadcast it.
    async fn enter(&self, job: &mut TranslationJob, event: JobEvent) -> Result<(), JobError> {
        job.advance(event.state)?;
        tracing::debug!(state = event.state.as_str(), "Job state changed");
        self.broadcaster.broadcast(event.to_text()).await;
        Ok(())
    }

    async fn finish_completed(&self, job: &mut TranslationJob, output_key: String) {
        if let Err(e) = job.complete(output_key.clone()) {
            tracing::error!(error = %e, "Completed transition rejected");
        }
        tracing::info!(output_key = %output_key, "Translation completed");

        self.broadcaster
            .broadcast(JobEvent::completed(job.session_id, &output_key).to_text())
            .await;
        self.record(job, Some(output_key), ResultStatus::Success)
            .await;
    }

    async fn finish_failed(&self, job: &mut TranslationJob, error: JobError) {
        match &error {
            JobError::Artifact(e) => tracing::warn!(error = %e, "Artifact I/O failed"),
            JobError::Encoding(key) => tracing::warn!(key = %key, "Source is not UTF-8"),
            JobError::Translation(e) => tracing::warn!(error = %e, "Translation provider failed"),
            JobError::State(e) => tracing::error!(error = %e, "Job state machine violated"),
            JobError::Panicked => tracing::error!("Job body panicked"),
        }

        let reason = error.to_string();
        if let Err(e) = job.fail(reason.clone()) {
            tracing::error!(error = %e, "Failed transition rejected");
        }

        self.broadcaster
            .broadcast(JobEvent::failed(job.session_id, &reason).to_text())
            .await;
        self.record(job, None, ResultStatus::Failed).await;
    }

    async fn record(
        &self,
        job: &TranslationJob,
        translated_file: Option<String>,
        result: ResultStatus,
    ) {
        let record = NewHistoryRecord {
            session_id: job.session_id,
            file_name: job.original_file_name.clone(),
            translated_file,
            language: job.target_language.clone(),
            result,
        };
        if let Err(e) = self.history.append(record).await {
            tracing::error!(error = %e, result = result.as_str(), "Failed to write history record");
        }
    }
}
