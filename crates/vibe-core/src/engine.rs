//! The vibe engine: per-element orchestration of prompt resolution,
//! cached generation, and rendering.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::cache::{hash_prompt, VibeCache};
use crate::config::{ErrorHook, VibeConfig};
use crate::element::{Dom, VibeElement, DEFAULT_SELECTOR};
use crate::provider::VibeProvider;
use crate::{Result, VibeError};

/// Markup shown while a generation is in flight, unless overridden.
const DEFAULT_LOADING_HTML: &str =
    r#"<div style="padding:1rem;color:#888;font-family:system-ui">✨ Vibing...</div>"#;

/// Fallback fragment rendered into a failing element when no error
/// callback is configured.
fn error_html(msg: &str) -> String {
    format!(
        r#"<div style="padding:1rem;color:#c00;font-family:system-ui;border:1px solid #c00;border-radius:4px"><strong>vibe check failed</strong><br>{}</div>"#,
        msg
    )
}

struct EngineInner {
    provider: Arc<dyn VibeProvider>,
    cache: VibeCache,
    http: reqwest::Client,
    loading: String,
    on_error: Option<ErrorHook>,
    debug: bool,
}

/// The engine composes a provider and a cache, and drives each vibe
/// element through `loading -> resolving -> compiling -> rendered` (or
/// `errored`). Cloning is cheap; clones share all state.
///
/// # Example
///
/// ```rust,ignore
/// use vibe_core::{VibeConfig, VibeEngine};
///
/// let engine = VibeEngine::new(VibeConfig::new(provider))?;
/// engine.init(&dom).await;
/// ```
#[derive(Clone)]
pub struct VibeEngine {
    inner: Arc<EngineInner>,
}

impl std::fmt::Debug for VibeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VibeEngine")
            .field("provider", &self.inner.provider.name())
            .field("debug", &self.inner.debug)
            .finish()
    }
}

impl VibeEngine {
    /// Build an engine from `config`.
    ///
    /// Fails synchronously when no provider was supplied; all other
    /// configuration is taken as-is.
    pub fn new(config: VibeConfig) -> Result<Self> {
        let provider = config.provider.ok_or_else(|| {
            VibeError::Config(
                "a provider is required; use openai, anthropic, gemini, or a custom provider"
                    .to_string(),
            )
        })?;

        Ok(Self {
            inner: Arc::new(EngineInner {
                provider,
                cache: config.cache.build(),
                http: reqwest::Client::new(),
                loading: config
                    .loading
                    .unwrap_or_else(|| DEFAULT_LOADING_HTML.to_string()),
                on_error: config.on_error,
                debug: config.debug,
            }),
        })
    }

    /// Turn a prompt into HTML, consulting the cache first.
    ///
    /// The cache key hashes `provider name + ":" + prompt`. Concurrent
    /// calls for the same uncached prompt are not coalesced; each one may
    /// invoke the provider.
    pub async fn compile(&self, prompt: &str) -> Result<String> {
        let inner = &self.inner;
        let key = hash_prompt(&format!("{}:{}", inner.provider.name(), prompt));

        if let Some(html) = inner.cache.get(&key) {
            if inner.debug {
                debug!("cache hit for {}", key);
            }
            return Ok(html);
        }

        if inner.debug {
            debug!("generating UI for prompt: {:.80}...", prompt);
        }
        let html = inner.provider.generate(prompt).await?;
        inner.cache.set(&key, &html);
        Ok(html)
    }

    /// Push `html` into `element`.
    ///
    /// The element's sink replaces its content and re-executes embedded
    /// scripts; see [`VibeElement::set_content`].
    pub fn render(&self, element: &dyn VibeElement, html: &str) {
        element.set_content(html);
    }

    /// Drop every cached generation.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    /// Process all elements matching [`DEFAULT_SELECTOR`] in `dom`.
    pub async fn init(&self, dom: &dyn Dom) {
        self.init_with_selector(dom, DEFAULT_SELECTOR).await;
    }

    /// Process all elements matching `selector`, concurrently.
    ///
    /// Pipelines are independent: a failing element reports through the
    /// error callback (or its fallback fragment) without disturbing its
    /// siblings. Returns once every pipeline has settled; no partial
    /// results are exposed mid-flight.
    pub async fn init_with_selector(&self, dom: &dyn Dom, selector: &str) {
        let elements = dom.select(selector);
        if self.inner.debug {
            debug!("found {} vibe element(s)", elements.len());
        }

        let mut tasks = JoinSet::new();
        for element in elements {
            let engine = self.clone();
            tasks.spawn(async move {
                engine.process_element(element).await;
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                warn!("element task did not settle cleanly: {}", err);
            }
        }
    }

    /// Drive one element through its full pipeline. Never escapes an
    /// error: failures end in the error callback or the fallback fragment.
    async fn process_element(&self, element: Arc<dyn VibeElement>) {
        element.set_content(&self.inner.loading);

        let outcome = match self.resolve_prompt(element.as_ref()).await {
            Ok(prompt) => self.compile(&prompt).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(html) => {
                self.render(element.as_ref(), &html);
                if self.inner.debug {
                    debug!(
                        "rendered {}",
                        element.src().unwrap_or_else(|| "inline vibe".to_string())
                    );
                }
            }
            Err(err) => {
                if let Some(hook) = &self.inner.on_error {
                    hook(&err, element.as_ref());
                } else {
                    element.set_content(&error_html(&err.to_string()));
                }
            }
        }
    }

    /// Resolve an element's prompt: a fetched `src` file wins over inline
    /// text; both absent (or blank) is an error.
    async fn resolve_prompt(&self, element: &dyn VibeElement) -> Result<String> {
        let prompt = if let Some(src) = element.src() {
            if self.inner.debug {
                debug!("fetching prompt file: {}", src);
            }
            let response = self
                .inner
                .http
                .get(&src)
                .send()
                .await
                .map_err(|e| VibeError::Network(e.to_string()))?;
            if !response.status().is_success() {
                return Err(VibeError::Network(format!(
                    "failed to fetch {}: {}",
                    src,
                    response.status().as_u16()
                )));
            }
            response
                .text()
                .await
                .map_err(|e| VibeError::Network(e.to_string()))?
        } else {
            element
                .inline_text()
                .map(|t| t.trim().to_string())
                .unwrap_or_default()
        };

        if prompt.is_empty() {
            return Err(VibeError::Prompt(
                "no prompt found; use src=\"/path/to.vibe\" or put text inside the element"
                    .to_string(),
            ));
        }
        Ok(prompt)
    }
}
