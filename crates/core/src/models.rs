//! # Research Team Models
//!
//! Centralized model-provider configuration for the research team.
//! Every stage talks to one OpenAI-compatible chat-completion endpoint
//! (OpenRouter by default), configured from the environment.
//!
//! ## Environment
//! - `OPENROUTER_API_KEY` - bearer credential (no key means every call
//!   resolves to the missing-key failure)
//! - `OPENROUTER_MODEL` - model id
//! - `OPENROUTER_URL` - completions endpoint
//! - `OPENROUTER_TIMEOUT_SECS` - per-call timeout

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const MODEL_VAR: &str = "OPENROUTER_MODEL";
pub const ENDPOINT_VAR: &str = "OPENROUTER_URL";
pub const TIMEOUT_VAR: &str = "OPENROUTER_TIMEOUT_SECS";

pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.1-8b-instruct";
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Sampling temperature sent with every completion request
pub const TEMPERATURE: f32 = 0.2;

/// Output token cap sent with every completion request
pub const MAX_TOKENS: u32 = 800;

/// Configuration for the chat-completion backend
///
/// ## Example
/// ```rust,ignore
/// use research_team_core::models::ModelConfig;
///
/// // From OPENROUTER_* variables (and .env)
/// let config = ModelConfig::from_env()?;
///
/// // Explicit
/// let config = ModelConfig::new("sk-or-...").with_model("openai/gpt-4o-mini");
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Bearer credential; `None` disables network calls
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model identifier (e.g., "meta-llama/llama-3.1-8b-instruct")
    pub model: String,
    /// Chat-completion endpoint URL
    pub endpoint: String,
    /// Per-call timeout covering connect, send and body read
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// Keeps the credential out of logs.
impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ModelConfig {
    /// Create a config with a credential and default model/endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Load from the process environment, reading `.env` first if present
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timeout = match get(TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .with_context(|| format!("{TIMEOUT_VAR} must be a whole number of seconds, got '{raw}'"))?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_key: get(API_KEY_VAR),
            model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: get(ENDPOINT_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set endpoint (for other OpenAI-compatible providers)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether a credential is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
