//! HTTP backend speaking the OpenAI-style chat-completions protocol.

use super::{BackendError, TextGenerator};
use crate::roles::RoleProfile;
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the HTTP generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpGeneratorConfig {
    /// Base URL of the provider API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token, when the provider requires one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> f64 {
    30.0
}

impl Default for HttpGeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl HttpGeneratorConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Builds a configuration from the process environment.
    ///
    /// Reads `OPENAI_API_KEY` (required) and `ASKFLOW_BASE_URL` (optional).
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?;
        let mut config = Self::new().with_api_key(api_key);
        if let Ok(base_url) = std::env::var("ASKFLOW_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        Ok(config)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// A [`TextGenerator`] backed by an OpenAI-compatible HTTP provider.
///
/// The role profile supplies the system persona, model and temperature;
/// the instruction becomes the user message.
pub struct HttpGenerator {
    client: reqwest::Client,
    config: HttpGeneratorConfig,
}

impl HttpGenerator {
    /// Creates a generator over the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Transport`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: HttpGeneratorConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs_f64(config.timeout_seconds))
            .build()
            .map_err(|err| BackendError::Transport(err.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl TextGenerator for HttpGenerator {
    async fn generate(
        &self,
        profile: &RoleProfile,
        instruction: &str,
    ) -> Result<String, BackendError> {
        let body = ChatRequest {
            model: &profile.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &profile.persona,
                },
                ChatMessage {
                    role: "user",
                    content: instruction,
                },
            ],
            temperature: profile.temperature,
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let mut request = self.client.post(&url).json(&body);
        if let Some(ref api_key) = self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(BackendError::Refused(format!("{status}: {detail}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(BackendError::EmptyResponse);
        }

        Ok(content)
    }
}
