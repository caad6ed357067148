//! Gemini `generateContent` client.
//!
//! Provides the `TextGenerator` trait the summarization service depends on,
//! and `GeminiClient`, which issues exactly one POST per call:
//! - credential passed as the `key` query parameter
//! - prompt in `contents[0].parts[0].text`
//! - a fixed request timeout, no retries

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::GeminiConfig;

// ============================================================================
// TextGenerator trait
// ============================================================================

/// Abstraction over "send a prompt, get the provider's response".
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Whether a credential is present. Callers check this before `generate`
    /// so a misconfigured deployment never reaches the network.
    fn is_configured(&self) -> bool;

    /// Issue one generation request for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse, GenerationError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

// ============================================================================
// Error types
// ============================================================================

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Gemini API key not configured")]
    NotConfigured,

    #[error("Request to Gemini timed out after {}s", .timeout.as_secs_f64())]
    Timeout { timeout: Duration },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(
        "Gemini API error ({status}): {}",
        .message.as_deref().unwrap_or("no error message")
    )]
    Api { status: u16, message: Option<String> },
}

impl GenerationError {
    /// The diagnostic message the provider put in its error body, if any.
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            GenerationError::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: Option<u32>,
    #[serde(default)]
    pub candidates_token_count: Option<u32>,
    #[serde(default)]
    pub total_token_count: Option<u32>,
}

/// Raw provider response. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// A response carrying a single candidate with `text`.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content {
                    parts: vec![Part {
                        text: Some(text.into()),
                    }],
                    role: Some("model".to_string()),
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            ..Default::default()
        }
    }

    /// `candidates[0].content.parts[0].text`, if present and non-empty.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref()?.block_reason.as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: Option<String>,
}

// ============================================================================
// GeminiClient
// ============================================================================

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, GenerationError> {
        Self::from_parts(
            config.api_key.clone(),
            config.base_url.clone(),
            config.model.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// Create a client against an arbitrary endpoint (tests point this at a
    /// local mock server).
    pub fn from_parts(
        api_key: Option<String>,
        base_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn transport_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout {
                timeout: self.timeout,
            }
        } else {
            GenerationError::Http(e)
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::NotConfigured)?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
                role: None,
            }],
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Calling Gemini generateContent");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiErrorResponse>(&error_body)
                .ok()
                .and_then(|e| e.error)
                .and_then(|e| e.message);

            tracing::error!(
                status = status.as_u16(),
                provider_message = message.as_deref().unwrap_or(""),
                body = %error_body,
                "Gemini API error"
            );

            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;

        if let Some(usage) = &body.usage_metadata {
            tracing::info!(
                prompt_tokens = usage.prompt_token_count,
                candidate_tokens = usage.candidates_token_count,
                total_tokens = usage.total_token_count,
                "Gemini response received"
            );
        } else {
            tracing::info!("Gemini response received");
        }

        Ok(body)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// ============================================================================
// TESTS
// ============================================================================
