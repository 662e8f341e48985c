//! Custom provider: wrap any async generation function.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use vibe_core::{Result, VibeProvider};

type GenerateFn = Arc<dyn Fn(String) -> BoxFuture<'static, Result<String>> + Send + Sync>;

/// A provider backed by a caller-supplied async function. Lets a host
/// plug in a local model, a proxy, or a canned response without writing
/// a full adapter.
///
/// # Example
///
/// ```rust,ignore
/// let provider = CustomProvider::new(|prompt| async move {
///     Ok(format!("<div>{}</div>", prompt))
/// })
/// .with_name("my-llm");
/// ```
pub struct CustomProvider {
    name: String,
    generate: GenerateFn,
}

impl CustomProvider {
    /// Wrap `generate`. The provider name defaults to `"custom"`.
    pub fn new<F, Fut>(generate: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        Self {
            name: "custom".to_string(),
            generate: Arc::new(move |prompt| Box::pin(generate(prompt))),
        }
    }

    /// Set the provider name. The name feeds the cache key, so distinct
    /// custom backends should carry distinct names.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl VibeProvider for CustomProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        (self.generate)(prompt.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibe_core::VibeError;

    #[tokio::test]
    async fn test_custom_provider_generates() {
        let provider = CustomProvider::new(|prompt| async move {
            Ok(format!("<div>{}</div>", prompt))
        })
        .with_name("my-llm");

        assert_eq!(provider.name(), "my-llm");
        assert_eq!(provider.generate("test").await.unwrap(), "<div>test</div>");
    }

    #[tokio::test]
    async fn test_name_defaults_to_custom() {
        let provider = CustomProvider::new(|_| async { Ok(String::new()) });
        assert_eq!(provider.name(), "custom");
    }

    #[tokio::test]
    async fn test_errors_propagate() {
        let provider = CustomProvider::new(|_| async {
            Err(VibeError::Provider("backend down".to_string()))
        });

        let err = provider.generate("test").await.unwrap_err();
        assert!(err.to_string().contains("backend down"));
    }
}
