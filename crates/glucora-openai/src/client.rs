// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible chat completions endpoints.
//!
//! Provides [`OpenAiGenerator`], which implements the generation capability
//! with bearer authentication, per-call timeouts, and transient-error retry.

use std::time::Duration;

use async_trait::async_trait;
use glucora_core::{
    AdapterType, CapabilityAdapter, GenerateAdapter, GenerationRequest, GlucoraError,
    HealthStatus, TextStream,
};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::sse;
use crate::types::{ApiErrorResponse, ChatMessage, ChatRequest, ChatResponse};

/// Construction options for [`OpenAiGenerator`].
#[derive(Clone)]
pub struct OpenAiOptions {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Full URL of the chat completions endpoint.
    pub base_url: String,
    /// Bound on every outbound call.
    pub call_timeout: Duration,
}

impl std::fmt::Debug for OpenAiOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiOptions")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

/// Generation adapter over the OpenAI chat completions protocol.
///
/// Retries once on transient errors (429, 500, 502, 503) with a short
/// delay before giving up.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl OpenAiGenerator {
    pub fn new(options: OpenAiOptions) -> Result<Self, GlucoraError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", options.api_key))
            .map_err(|e| GlucoraError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(options.call_timeout)
            .build()
            .map_err(|e| GlucoraError::Generation {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: options.base_url,
            max_retries: 1,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    fn chat_request(request: &GenerationRequest, stream: bool) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system_prompt {
            messages.push(ChatMessage::system(system.clone()));
        }
        messages.push(ChatMessage::user(request.user_text.clone()));
        ChatRequest {
            model: request.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            stream,
        }
    }

    /// Sends the request, retrying once on transient failures, and returns
    /// the successful HTTP response.
    async fn send_with_retry(&self, body: &ChatRequest) -> Result<reqwest::Response, GlucoraError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying generation request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&self.base_url)
                .json(body)
                .send()
                .await
                .map_err(|e| GlucoraError::Generation {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "generation response received");

            if status.is_success() {
                return Ok(response);
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(GlucoraError::Generation {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "generation API error ({}): {}",
                    api_err.error.type_.unwrap_or_else(|| "unknown".to_string()),
                    api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(GlucoraError::Generation {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| GlucoraError::Generation {
            message: "generation request failed after retries".into(),
            source: None,
        }))
    }
}

/// True for HTTP status codes worth one retry.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}

#[async_trait]
impl CapabilityAdapter for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai-generator"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generation
    }

    async fn health_check(&self) -> Result<HealthStatus, GlucoraError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), GlucoraError> {
        Ok(())
    }
}

#[async_trait]
impl GenerateAdapter for OpenAiGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GlucoraError> {
        let body = Self::chat_request(&request, false);
        let response = self.send_with_retry(&body).await?;

        let text = response.text().await.map_err(|e| GlucoraError::Generation {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| GlucoraError::Generation {
                message: format!("failed to parse API response: {e}"),
                source: Some(Box::new(e)),
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GlucoraError::Generation {
                message: "API response contained no choices".into(),
                source: None,
            })
    }

    async fn generate_stream(
        &self,
        request: GenerationRequest,
    ) -> Result<TextStream, GlucoraError> {
        let body = Self::chat_request(&request, true);
        let response = self.send_with_retry(&body).await?;
        Ok(sse::parse_chat_stream(response))
    }
}
