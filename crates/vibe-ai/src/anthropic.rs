//! Anthropic provider: messages endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use vibe_core::{Result, VibeError, VibeProvider};

use crate::{strip_code_fence, DEFAULT_SYSTEM_PROMPT};

const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
const MAX_TOKENS: u32 = 4096;

/// Options for [`AnthropicProvider`].
#[derive(Debug, Clone)]
pub struct AnthropicOptions {
    /// API key. Generation is rejected before any network call when unset.
    pub api_key: Option<String>,

    /// Model identifier.
    pub model: String,

    /// Base URL of the API.
    pub base_url: String,

    /// Override for the shared default system instruction.
    pub system_prompt: Option<String>,
}

impl Default for AnthropicOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: ANTHROPIC_API_BASE.to_string(),
            system_prompt: None,
        }
    }
}

impl AnthropicOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the system instruction.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// Anthropic message request.
#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Anthropic message response. The generated text is the concatenation of
/// every content block.
#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

/// Anthropic provider for UI generation.
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    client: Client,
    options: AnthropicOptions,
}

impl AnthropicProvider {
    /// Create a provider with the given options.
    pub fn new(options: AnthropicOptions) -> Self {
        Self {
            client: Client::new(),
            options,
        }
    }

    /// Create a provider from environment variables.
    ///
    /// Reads `ANTHROPIC_API_KEY` and optionally `ANTHROPIC_MODEL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| VibeError::Config("ANTHROPIC_API_KEY not set".to_string()))?;

        let mut options = AnthropicOptions::new(api_key);
        if let Ok(model) = std::env::var("ANTHROPIC_MODEL") {
            options = options.with_model(model);
        }
        Ok(Self::new(options))
    }

    fn api_key(&self) -> Result<&str> {
        match self.options.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(VibeError::Config(
                "anthropic provider requires an apiKey".to_string(),
            )),
        }
    }
}

#[async_trait]
impl VibeProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key()?;
        debug!("generating with anthropic model {}", self.options.model);

        let system = self
            .options
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        let request = MessageRequest {
            model: self.options.model.clone(),
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let url = format!("{}/v1/messages", self.options.base_url);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| VibeError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VibeError::Provider(format!(
                "anthropic API error ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let message: MessageResponse = response
            .json()
            .await
            .map_err(|e| VibeError::Provider(e.to_string()))?;

        if message.content.is_empty() {
            return Err(VibeError::Provider("no content generated".to_string()));
        }
        let text: String = message
            .content
            .iter()
            .map(|block| block.text.as_str())
            .collect();

        Ok(strip_code_fence(&text))
    }
}
