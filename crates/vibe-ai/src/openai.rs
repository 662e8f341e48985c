//! OpenAI provider: chat-completion style endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use vibe_core::{Result, VibeError, VibeProvider};

use crate::{strip_code_fence, DEFAULT_SYSTEM_PROMPT};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Options for [`OpenAiProvider`].
#[derive(Debug, Clone)]
pub struct OpenAiOptions {
    /// API key. Generation is rejected before any network call when unset.
    pub api_key: Option<String>,

    /// Model identifier.
    pub model: String,

    /// Base URL of the API.
    pub base_url: String,

    /// Override for the shared default system instruction.
    pub system_prompt: Option<String>,
}

impl Default for OpenAiOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: OPENAI_API_BASE.to_string(),
            system_prompt: None,
        }
    }
}

impl OpenAiOptions {
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

/// OpenAI chat-completion request.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat-completion response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// OpenAI provider for UI generation.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    options: OpenAiOptions,
}

impl OpenAiProvider {
    /// Create a provider with the given options.
    pub fn new(options: OpenAiOptions) -> Self {
        Self {
            client: Client::new(),
            options,
        }
    }

    /// Create a provider from environment variables.
    ///
    /// Reads `OPENAI_API_KEY` and optionally `OPENAI_MODEL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| VibeError::Config("OPENAI_API_KEY not set".to_string()))?;

        let mut options = OpenAiOptions::new(api_key);
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            options = options.with_model(model);
        }
        Ok(Self::new(options))
    }

    fn api_key(&self) -> Result<&str> {
        match self.options.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(VibeError::Config(
                "openai provider requires an apiKey".to_string(),
            )),
        }
    }
}

#[async_trait]
impl VibeProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key()?;
        debug!("generating with openai model {}", self.options.model);

        let system = self
            .options
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        let request = ChatRequest {
            model: self.options.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
        };

        let url = format!("{}/chat/completions", self.options.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| VibeError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VibeError::Provider(format!(
                "openai API error ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| VibeError::Provider(e.to_string()))?;

        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| VibeError::Provider("no content generated".to_string()))?;

        Ok(strip_code_fence(&content))
    }
}
