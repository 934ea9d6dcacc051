use std::time::Duration;

/// Default endpoint of the translation API.
pub const DEFAULT_API_URL: &str = "https://api.example.com/translate";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the translation API.
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// Full URL the translation request is POSTed to.
    pub api_url: String,
    /// Bearer token; the `Authorization` header is omitted when `None`.
    pub api_key: Option<String>,
    /// Whole-request timeout, including reading the response body.
    pub timeout: Duration,
}

impl TranslatorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                              |
    /// |----------------------------|--------------------------------------|
    /// | `TRANSLATION_API_URL`      | `https://api.example.com/translate`  |
    /// | `LLM_API_KEY`              | unset                                |
    /// | `TRANSLATION_TIMEOUT_SECS` | `60`                                 |
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("TRANSLATION_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let api_key = std::env::var("LLM_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let timeout_secs: u64 = std::env::var("TRANSLATION_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("TRANSLATION_TIMEOUT_SECS must be a valid u64");

        Self {
            api_url,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Configuration pointing at `api_url` with no key and the default timeout.
    pub fn for_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
