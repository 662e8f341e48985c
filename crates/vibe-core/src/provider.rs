//! Generation provider trait and test double.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::Result;

/// A capability that turns a natural-language prompt into HTML.
///
/// Implementations are interchangeable: the engine only ever calls `name`
/// and `generate`.
#[async_trait]
pub trait VibeProvider: Send + Sync {
    /// Stable provider name. Part of the cache key, so switching providers
    /// invalidates cached entries without explicit versioning.
    fn name(&self) -> &str;

    /// Generate HTML for `prompt`. Fails on network or auth errors.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// A canned provider for tests: fixed responses plus a call counter.
#[derive(Debug, Default)]
pub struct MockProvider {
    responses: HashMap<String, String>,
    fallback: Option<String>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `html` for any prompt without a dedicated response.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.fallback = Some(html.into());
        self
    }

    /// Return `html` for exactly `prompt`.
    pub fn with_response(mut self, prompt: impl Into<String>, html: impl Into<String>) -> Self {
        self.responses.insert(prompt.into(), html.into());
        self
    }

    /// How many times `generate` has been invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VibeProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let html = self
            .responses
            .get(prompt)
            .cloned()
            .or_else(|| self.fallback.clone())
            .unwrap_or_else(|| format!("<div>{}</div>", prompt));
        Ok(html)
    }
}
