//! Google Gemini provider: generate-content endpoint.
//!
//! Unlike the other adapters, Gemini authenticates with the API key as a
//! query parameter rather than a request header.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use vibe_core::{Result, VibeError, VibeProvider};

use crate::{strip_code_fence, DEFAULT_SYSTEM_PROMPT};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Options for [`GeminiProvider`].
#[derive(Debug, Clone)]
pub struct GeminiOptions {
    /// API key. Generation is rejected before any network call when unset.
    pub api_key: Option<String>,

    /// Model identifier.
    pub model: String,

    /// Base URL of the API.
    pub base_url: String,

    /// Override for the shared default system instruction.
    pub system_prompt: Option<String>,
}

impl Default for GeminiOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
            system_prompt: None,
        }
    }
}

impl GeminiOptions {
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

/// Gemini generate-content request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

/// Gemini generate-content response.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}

/// Google Gemini provider for UI generation.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    options: GeminiOptions,
}

impl GeminiProvider {
    /// Create a provider with the given options.
    pub fn new(options: GeminiOptions) -> Self {
        Self {
            client: Client::new(),
            options,
        }
    }

    /// Create a provider from environment variables.
    ///
    /// Reads `GOOGLE_API_KEY` and optionally `GEMINI_MODEL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .map_err(|_| VibeError::Config("GOOGLE_API_KEY not set".to_string()))?;

        let mut options = GeminiOptions::new(api_key);
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            options = options.with_model(model);
        }
        Ok(Self::new(options))
    }

    fn api_key(&self) -> Result<&str> {
        match self.options.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(VibeError::Config(
                "gemini provider requires an apiKey".to_string(),
            )),
        }
    }
}

#[async_trait]
impl VibeProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key()?;
        debug!("generating with gemini model {}", self.options.model);

        let system = self
            .options
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            system_instruction: Content {
                parts: vec![Part { text: system }],
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.options.base_url, self.options.model, api_key
        );
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| VibeError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VibeError::Provider(format!(
                "gemini API error ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let generated: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| VibeError::Provider(e.to_string()))?;

        let text = generated
            .candidates
            .as_ref()
            .and_then(|candidates| candidates.first())
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<String>()
            })
            .ok_or_else(|| VibeError::Provider("no content generated".to_string()))?;

        Ok(strip_code_fence(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = GeminiOptions::default();
        assert_eq!(options.model, "gemini-2.0-flash");
        assert_eq!(options.base_url, "https://generativelanguage.googleapis.com");
        assert!(options.api_key.is_none());
    }

    #[tokio::test]
    async fn test_generate_requires_api_key() {
        let provider = GeminiProvider::new(GeminiOptions::default());
        let err = provider.generate("hello").await.unwrap_err();
        assert!(err.to_string().contains("apiKey"));
    }
}
