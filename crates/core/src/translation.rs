//! Contract for the remote translation provider.

use async_trait::async_trait;

/// Failure modes of a translation call.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// Transport-level failure (connect, DNS, TLS, body read).
    #[error("Translation request failed: {0}")]
    Request(String),

    #[error("Translation request timed out")]
    Timeout,

    /// The provider answered with a non-2xx status.
    #[error("Translation API returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Malformed translation response: {0}")]
    MalformedResponse(String),
}

/// Translates a text into a target language.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslateError>;
}
