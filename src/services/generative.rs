// src/services/generative.rs

//! OpenAI-compatible chat completion client.
//!
//! Both report stages talk to `/chat/completions`: the analysis stage sends
//! screenshots as base64 data URLs to a vision model, the program stage sends
//! plain text.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::error::{AppError, Result};
use crate::models::ApiSettings;
use crate::utils::http::{create_async_client, retry_after};

/// Failure of a single completion attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("rate limited (HTTP 429): {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("empty completion")]
    EmptyResponse,

    #[error("unparseable response: {0}")]
    Parse(String),
}

impl ApiError {
    /// Whether retrying the same request can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::RateLimited { .. }
                | ApiError::Server { .. }
                | ApiError::Timeout
                | ApiError::Network(_)
                | ApiError::EmptyResponse
        )
    }

    /// Server-provided wait before the next attempt.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ApiError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Classify a non-success HTTP status.
pub fn parse_http_error(status: u16, body: &str, retry_after: Option<Duration>) -> ApiError {
    let message = truncate(body, 300);
    match status {
        401 | 403 => ApiError::Authentication(message),
        408 => ApiError::Timeout,
        429 => ApiError::RateLimited {
            message,
            retry_after,
        },
        500..=599 => ApiError::Server { status, message },
        _ => ApiError::Rejected { status, message },
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

/// An image attached to a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub name: String,
    pub mime: &'static str,
    pub base64: String,
}

impl ImageInput {
    pub fn png(name: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            mime: "image/png",
            base64: STANDARD.encode(bytes),
        }
    }

    /// Read a PNG from disk.
    pub async fn load_png(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::png(name, &bytes))
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.base64)
    }
}

/// One chat completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system: Option<String>,
    pub prompt: String,
    pub images: Vec<ImageInput>,
    pub temperature: f32,
}

impl CompletionRequest {
    /// JSON body for `/chat/completions`.
    pub fn to_body(&self) -> Value {
        let mut messages = Vec::new();
        if let Some(system) = &self.system {
            messages.push(json!({ "role": "system", "content": system }));
        }

        let content = if self.images.is_empty() {
            Value::String(self.prompt.clone())
        } else {
            let mut parts = vec![json!({ "type": "text", "text": self.prompt })];
            parts.extend(self.images.iter().map(|image| {
                json!({
                    "type": "image_url",
                    "image_url": { "url": image.data_url() }
                })
            }));
            Value::Array(parts)
        };
        messages.push(json!({ "role": "user", "content": content }));

        json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        })
    }
}

/// A chat completion backend.
#[async_trait]
pub trait GenerativeApi: Send + Sync {
    /// Run one completion attempt and return the assistant text.
    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, ApiError>;
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Extract the first choice's text from a response body.
pub fn parse_completion(body: &str) -> std::result::Result<String, ApiError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))?;
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ApiError::EmptyResponse);
    }
    Ok(text)
}

/// `reqwest` client for any OpenAI-compatible endpoint (OpenAI, xAI, ...).
pub struct OpenAiCompatible {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiCompatible {
    pub fn new(client: Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        }
    }

    /// Build a client from stage settings, reading the key from the environment.
    pub fn from_settings(settings: &ApiSettings) -> Result<Self> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AppError::config(format!(
                    "API key variable {} is not set",
                    settings.api_key_env
                ))
            })?;
        let client = create_async_client(settings.timeout)?;
        Ok(Self::new(client, &settings.base_url, api_key))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerativeApi for OpenAiCompatible {
    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, ApiError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request.to_body())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout
                } else {
                    ApiError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let wait = retry_after(response.headers());
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        if !(200..300).contains(&status) {
            return Err(parse_http_error(status, &body, wait));
        }
        parse_completion(&body)
    }
}
