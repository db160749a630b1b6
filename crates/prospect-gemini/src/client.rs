//! HTTP client for the Gemini `generateContent` REST endpoint.
//!
//! Wraps `reqwest` with API-key handling, typed request/response bodies, and
//! retry on transient failures. Non-2xx answers are decoded from Gemini's
//! `{"error": {...}}` envelope into [`GeminiError::Api`].

use std::time::Duration;

use prospect_core::config::DEFAULT_GEMINI_BASE_URL;
use reqwest::{Client, Url};

use crate::error::GeminiError;
use crate::retry::retry_with_backoff;
use crate::types::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse};

/// Client for the Gemini REST API.
///
/// Use [`GeminiClient::new`] for production or [`GeminiClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a new client pointed at the production Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, GeminiError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_GEMINI_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// Retries default to none; see [`GeminiClient::with_retry_policy`].
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeminiError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("prospect/0.1 (lead-generation)")
            .build()?;

        // Exactly one trailing slash so `Url::join` appends below the API
        // version segment instead of replacing it.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| GeminiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Sets how many extra attempts transient failures get, and the base
    /// delay of the exponential back-off between them.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Calls `models/{model}:generateContent`.
    ///
    /// # Errors
    ///
    /// - [`GeminiError::Api`] if the API answers with a non-2xx status after
    ///   retries are exhausted.
    /// - [`GeminiError::Http`] on network failure.
    /// - [`GeminiError::Deserialize`] if the body is not a valid response.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = self.model_url(model)?;
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.post_once(&url, request)
        })
        .await
    }

    /// Builds `{base}/models/{model}:generateContent`.
    fn model_url(&self, model: &str) -> Result<Url, GeminiError> {
        self.base_url
            .join(&format!("models/{model}:generateContent"))
            .map_err(|e| GeminiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn post_once(
        &self,
        url: &Url,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let response = self
            .client
            .post(url.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| GeminiError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }
}

/// Extracts a readable message from a Gemini error body, falling back to the
/// raw body when it is not the usual envelope.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(status) => format!("{status}: {}", envelope.error.message),
            None => envelope.error.message,
        },
        Err(_) => body.chars().take(200).collect(),
    }
}
