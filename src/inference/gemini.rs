//! Gemini `generateContent` REST client

use crate::inference::client::VisionModel;
use crate::io::configuration::{
    DEFAULT_ENDPOINT, DEFAULT_MODEL, RATE_LIMIT_BACKOFF_MS, RATE_LIMIT_RETRIES,
    REQUEST_TIMEOUT_SECS,
};
use crate::io::error::{CollageError, Result, validation_error};
use base64::Engine;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for the Gemini API
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; validity is only discovered on the first call
    pub api_key: String,
    /// Model name, e.g. `gemini-2.5-flash`
    pub model: String,
    /// Base URL up to and including the API version
    pub endpoint: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Default model and endpoint with the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    /// Full URL of the `generateContent` call
    pub fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

// Keep the key out of debug output
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Request body of `generateContent`
#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    /// Conversation turns (always one here)
    pub contents: Vec<Content>,
}

/// One conversation turn
#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    /// Ordered parts of the turn
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Text or inline image part
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Plain text
    Text {
        /// The text
        text: String,
    },
    /// Base64-encoded inline bytes
    InlineData {
        /// Payload and its MIME type
        inline_data: InlineData,
    },
    /// Any part kind this client does not use (thoughts, function calls, ...)
    Other(serde_json::Value),
}

/// Inline binary payload
#[derive(Debug, Serialize, Deserialize)]
pub struct InlineData {
    /// MIME type of the payload
    pub mime_type: String,
    /// Standard base64 of the payload
    pub data: String,
}

/// Response body of `generateContent`
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    /// Candidate replies, best first
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One candidate reply
#[derive(Debug, Deserialize)]
pub struct Candidate {
    /// Reply content, absent when the candidate was blocked
    pub content: Option<Content>,
}

impl GenerateRequest {
    /// Prompt followed by one JPEG attachment
    pub fn with_image(prompt: &str, jpeg: &[u8]) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/jpeg".to_string(),
                            data: base64::engine::general_purpose::STANDARD.encode(jpeg),
                        },
                    },
                ],
            }],
        }
    }
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate, if any
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                Part::InlineData { .. } | Part::Other(_) => None,
            })
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Blocking Gemini client
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Build a client
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is blank or the HTTP client cannot be
    /// constructed
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(validation_error("api_key", &"an API key is required"));
        }

        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Settings in use
    pub const fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn send(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let url = self.config.url();
        let mut delay = Duration::from_millis(RATE_LIMIT_BACKOFF_MS);

        for retry in 0..=RATE_LIMIT_RETRIES {
            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.config.api_key)
                .json(request)
                .send()?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS && retry < RATE_LIMIT_RETRIES {
                tracing::warn!(retry = retry + 1, max = RATE_LIMIT_RETRIES, "rate limited");
                std::thread::sleep(delay);
                delay *= 2;
                continue;
            }

            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(CollageError::Inference {
                    status: Some(status.as_u16()),
                    reason: body,
                });
            }

            return Ok(response.json()?);
        }

        Err(CollageError::Inference {
            status: Some(StatusCode::TOO_MANY_REQUESTS.as_u16()),
            reason: "rate limit retries exhausted".to_string(),
        })
    }
}

impl VisionModel for GeminiClient {
    fn generate(&self, prompt: &str, jpeg: &[u8]) -> Result<String> {
        tracing::debug!(model = %self.config.model, bytes = jpeg.len(), "sending inference request");
        let response = self.send(&GenerateRequest::with_image(prompt, jpeg))?;
        response.text().ok_or_else(|| CollageError::Inference {
            status: None,
            reason: "response contained no text".to_string(),
        })
    }
}
