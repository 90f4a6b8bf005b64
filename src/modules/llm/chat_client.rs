//! Client for OpenAI-compatible chat completion APIs (Groq by default)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

use crate::core::config::LlmConfig;
use crate::core::error::{AppError, Result};

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    /// `system`, `user` or `assistant`
    #[schema(example = "user")]
    pub role: String,
    #[schema(example = "Which region sold the most?")]
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling parameters for one completion
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct ChatCompletionClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl ChatCompletionClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Fails fast when no API key is set, before any file is read
    pub fn ensure_configured(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::ExternalServiceError("LLM API key is not configured".to_string())
        })
    }

    /// Send the conversation and return the trimmed text of the first choice.
    ///
    /// Not retried: any failure surfaces as a single external service error.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<String> {
        let api_key = self.ensure_configured()?;

        let url = format!("{}/chat/completions", self.base_url);
        let request_body = CompletionRequest {
            model: &self.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            max_tokens = options.max_tokens,
            "Requesting chat completion"
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Chat completion request failed: {}", e);
                service_error(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Chat completion API error: HTTP {} - {}", status, body);
            return Err(service_error(format!("HTTP {}", status)));
        }

        let completion = response.json::<CompletionResponse>().await.map_err(|e| {
            tracing::error!("Failed to parse chat completion response: {}", e);
            service_error(e)
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| service_error("response contained no choices"))
    }
}

fn service_error(detail: impl std::fmt::Display) -> AppError {
    AppError::ExternalServiceError(format!(
        "An error occurred with the AI service: {}",
        detail
    ))
}
