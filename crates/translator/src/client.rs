//! REST client for the translation endpoint.
//!
//! Request:  `POST {api_url}` with `{"text": ..., "target_language": ...}`
//! Response: `{"translated_text": ...}`

use async_trait::async_trait;
use polyglot_core::translation::{TranslateError, Translator};
use serde::{Deserialize, Serialize};

use crate::config::TranslatorConfig;

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    target_language: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translated_text: String,
}

/// HTTP-backed [`Translator`].
pub struct HttpTranslator {
    client: reqwest::Client,
    config: TranslatorConfig,
}

impl HttpTranslator {
    /// Build a client with the configured timeout.
    pub fn new(config: TranslatorConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Reuse an existing [`reqwest::Client`] (its own timeout applies).
    pub fn with_client(client: reqwest::Client, config: TranslatorConfig) -> Self {
        Self { client, config }
    }

    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }
}

fn map_request_error(err: reqwest::Error) -> TranslateError {
    if err.is_timeout() {
        TranslateError::Timeout
    } else {
        TranslateError::Request(err.to_string())
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslateError> {
        let mut request = self.client.post(&self.config.api_url).json(&TranslateRequest {
            text,
            target_language,
        });
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Translation API returned an error");
            return Err(TranslateError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await.map_err(map_request_error)?;
        let parsed: TranslateResponse = serde_json::from_slice(&body)
            .map_err(|e| TranslateError::MalformedResponse(e.to_string()))?;

        Ok(parsed.translated_text)
    }
}
