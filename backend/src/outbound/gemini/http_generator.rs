//! Reqwest-backed Gemini adapter.
//!
//! This adapter owns transport details only: request serialisation, optional
//! timeout, HTTP error mapping and decoding of the first candidate. The API
//! key is sent in the `x-goog-api-key` header and never appears in URLs,
//! logs or `Debug` output.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{GenerateContentRequestDto, GenerateContentResponseDto};
use crate::domain::ports::{TextGenerationError, TextGenerator};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Connection settings for the Gemini API.
pub struct GeminiSettings {
    /// Base endpoint, for example `https://generativelanguage.googleapis.com/v1beta`.
    pub endpoint: Url,
    /// Model name, for example `gemini-1.5-pro`.
    pub model: String,
    pub api_key: Zeroizing<String>,
    /// Whole-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Text generator calling `models/{model}:generateContent`.
pub struct GeminiTextGenerator {
    client: Client,
    url: Url,
    api_key: Zeroizing<String>,
}

impl fmt::Debug for GeminiTextGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiTextGenerator")
            .field("url", &self.url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Build the `generateContent` URL for `model` under `endpoint`.
fn generate_content_url(endpoint: &Url, model: &str) -> Result<Url, TextGenerationError> {
    let base = endpoint.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}/models/{model}:generateContent")).map_err(|error| {
        TextGenerationError::transport(format!("invalid Gemini endpoint: {error}"))
    })
}

impl GeminiTextGenerator {
    /// Build an adapter from settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint is unusable or the reqwest client
    /// cannot be constructed.
    pub fn new(settings: GeminiSettings) -> Result<Self, TextGenerationError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|error| TextGenerationError::transport(error.to_string()))?;
        Ok(Self {
            client,
            url: generate_content_url(&settings.endpoint, &settings.model)?,
            api_key: settings.api_key,
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, TextGenerationError> {
        debug!(url = %self.url, prompt_chars = prompt.chars().count(), "calling Gemini");
        let response = self
            .client
            .post(self.url.clone())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&GenerateContentRequestDto::from_prompt(prompt))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_first_text(body.as_ref())
    }
}

/// Stand-in used when no API key is configured; every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledTextGenerator;

#[async_trait]
impl TextGenerator for DisabledTextGenerator {
    async fn generate(&self, _prompt: &str) -> Result<Option<String>, TextGenerationError> {
        Err(TextGenerationError::not_configured())
    }
}

fn parse_first_text(body: &[u8]) -> Result<Option<String>, TextGenerationError> {
    let decoded: GenerateContentResponseDto = serde_json::from_slice(body).map_err(|error| {
        TextGenerationError::decode(format!("invalid Gemini JSON payload: {error}"))
    })?;
    Ok(decoded.into_first_text())
}

fn map_transport_error(error: reqwest::Error) -> TextGenerationError {
    // reqwest includes the URL in its messages; the key is a header so the
    // URL carries nothing secret.
    TextGenerationError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TextGenerationError {
    TextGenerationError::status(status.as_u16(), body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
