//! # Vibe AI
//!
//! Provider implementations for the vibe engine.
//!
//! Ready-to-use backends:
//!
//! - **OpenAI**: chat-completion endpoint
//! - **Anthropic**: messages endpoint
//! - **Gemini**: generate-content endpoint
//! - **Custom**: wrap any async function
//!
//! ## Example
//!
//! ```rust,ignore
//! use vibe_ai::{OpenAiOptions, OpenAiProvider};
//! use vibe_core::{boot, VibeConfig};
//!
//! let provider = OpenAiProvider::new(OpenAiOptions::new("sk-..."));
//! let engine = boot(VibeConfig::new(provider), &dom).await?;
//! ```

pub mod anthropic;
pub mod custom;
pub mod gemini;
pub mod openai;

pub use anthropic::{AnthropicOptions, AnthropicProvider};
pub use custom::CustomProvider;
pub use gemini::{GeminiOptions, GeminiProvider};
pub use openai::{OpenAiOptions, OpenAiProvider};

/// Re-export core types for convenience.
pub use vibe_core::{Result, VibeError, VibeProvider};

use std::sync::LazyLock;

use regex::Regex;

/// System instruction shared by every adapter: emit raw markup only.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a frontend code generator. The user will describe a UI component or page in plain text. You must respond with ONLY valid HTML that can be directly injected into a webpage. You may include inline <style> tags and <script> tags. Do not include any markdown, explanations, or code fences. Just raw HTML/CSS/JS.";

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:[a-zA-Z0-9]*)\s*\n?(.*?)```").expect("code fence pattern")
});

/// Strip surrounding code-fence markup the model may have added despite
/// instructions. Inputs without a fence come back trimmed.
pub(crate) fn strip_code_fence(content: &str) -> String {
    match CODE_FENCE.captures(content) {
        Some(caps) => caps
            .get(1)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
        None => content.trim().to_string(),
    }
}
