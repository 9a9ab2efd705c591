//! # Model Caller
//!
//! One chat-completion POST per prompt. Every failure mode is folded into
//! [`StageOutput::Failed`] so a stage can always hand *some* text to the
//! next one; the [`ModelError`] tag keeps the kind and detail available to
//! callers that need to tell real content from a failed call.

use crate::models::{ModelConfig, MAX_TOKENS, TEMPERATURE};
use anyhow::Context;
use async_trait::async_trait;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::error::Error as _;
use thiserror::Error;

/// Why a model call produced no content.
///
/// The `Display` rendering is the sentinel text forwarded into later prompts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("[OpenRouter API key missing: set OPENROUTER_API_KEY in env]")]
    MissingApiKey,

    #[error("[OpenRouter returned non-json response: status={status}] {body}")]
    NonJson { status: u16, body: String },

    #[error("[OpenRouter unexpected response structure] status={status} body={body}")]
    UnexpectedShape { status: u16, body: String },

    #[error("[OpenRouter request timed out]")]
    Timeout,

    #[error("[OpenRouter call failed] {0}")]
    Transport(String),
}

impl ModelError {
    /// Stable snake_case name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            ModelError::MissingApiKey => "missing_api_key",
            ModelError::NonJson { .. } => "non_json",
            ModelError::UnexpectedShape { .. } => "unexpected_shape",
            ModelError::Timeout => "timeout",
            ModelError::Transport(_) => "transport",
        }
    }

    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ModelError::Timeout;
        }
        let mut detail = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            detail.push_str(": ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }
        ModelError::Transport(detail)
    }
}

/// Output of a single stage: model text, or the failure that replaced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutput {
    Completed(String),
    Failed(ModelError),
}

impl StageOutput {
    /// Text handed to downstream prompts and rendered on the wire.
    /// Failures render as their sentinel string.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            StageOutput::Completed(text) => Cow::Borrowed(text.as_str()),
            StageOutput::Failed(err) => Cow::Owned(err.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StageOutput::Failed(_))
    }

    pub fn failure(&self) -> Option<&ModelError> {
        match self {
            StageOutput::Failed(err) => Some(err),
            StageOutput::Completed(_) => None,
        }
    }
}

impl From<ModelError> for StageOutput {
    fn from(err: ModelError) -> Self {
        StageOutput::Failed(err)
    }
}

impl Serialize for StageOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text())
    }
}

/// Anything that can turn a prompt into a stage output.
///
/// Implementations must not fail; failures are reported in-band.
#[async_trait]
pub trait ModelCaller: Send + Sync {
    async fn complete(&self, prompt: &str) -> StageOutput;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat-completion client (OpenRouter or any OpenAI-compatible endpoint)
pub struct ChatCompletionClient {
    config: ModelConfig,
    http: reqwest::Client,
}

impl ChatCompletionClient {
    /// Connection pooling is off: each call gets its own connection, so a
    /// client can outlive the runtime that made an earlier call.
    pub fn new(config: ModelConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    async fn post(&self, api_key: &str, prompt: &str) -> StageOutput {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let resp = match self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => return ModelError::from_transport(e).into(),
        };

        let status = resp.status().as_u16();
        match resp.text().await {
            Ok(text) => parse_completion(status, &text),
            Err(e) => ModelError::from_transport(e).into(),
        }
    }
}

#[async_trait]
impl ModelCaller for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> StageOutput {
        let Some(api_key) = self.config.api_key.as_deref() else {
            tracing::warn!("No API key configured, skipping model call");
            return ModelError::MissingApiKey.into();
        };
        tracing::debug!(model = %self.config.model, prompt_len = prompt.len(), "Calling model");

        let output = match tokio::time::timeout(self.config.timeout, self.post(api_key, prompt)).await
        {
            Ok(output) => output,
            Err(_) => ModelError::Timeout.into(),
        };

        match output.failure() {
            Some(err) => tracing::warn!(kind = err.kind(), "Model call failed: {}", err),
            None => tracing::debug!(model = %self.config.model, "Model call completed"),
        }
        output
    }
}

/// Pull `choices[0].message.content` out of a completion response body
pub fn parse_completion(status: u16, body: &str) -> StageOutput {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => {
            return ModelError::NonJson {
                status,
                body: body.to_string(),
            }
            .into()
        }
    };

    match value
        .pointer("/choices/0/message/content")
        .and_then(serde_json::Value::as_str)
    {
        Some(content) => StageOutput::Completed(content.trim().to_string()),
        None => ModelError::UnexpectedShape {
            status,
            body: value.to_string(),
        }
        .into(),
    }
}
