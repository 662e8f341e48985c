//! Engine tests against an in-memory host document: per-element pipelines,
//! failure isolation, error routing, and prompt-file fetching.

use std::sync::{Arc, Mutex};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vibe_core::{
    boot, CacheOptions, Dom, MockProvider, StorageKind, VibeConfig, VibeElement, VibeEngine,
    DEFAULT_SELECTOR,
};

/// A vibe element that records every content write.
struct TestElement {
    text: Option<String>,
    src: Option<String>,
    writes: Mutex<Vec<String>>,
}

impl TestElement {
    fn inline(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: Some(text.to_string()),
            src: None,
            writes: Mutex::new(Vec::new()),
        })
    }

    fn with_src(src: String) -> Arc<Self> {
        Arc::new(Self {
            text: None,
            src: Some(src),
            writes: Mutex::new(Vec::new()),
        })
    }

    fn empty() -> Arc<Self> {
        Arc::new(Self {
            text: None,
            src: None,
            writes: Mutex::new(Vec::new()),
        })
    }

    fn last_content(&self) -> String {
        self.writes.lock().unwrap().last().cloned().unwrap_or_default()
    }

    fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

impl VibeElement for TestElement {
    fn inline_text(&self) -> Option<String> {
        self.text.clone()
    }

    fn src(&self) -> Option<String> {
        self.src.clone()
    }

    fn set_content(&self, html: &str) {
        self.writes.lock().unwrap().push(html.to_string());
    }
}

/// A host document over a fixed element list, recording the selector used.
struct TestDom {
    elements: Vec<Arc<TestElement>>,
    selectors: Mutex<Vec<String>>,
}

impl TestDom {
    fn new(elements: Vec<Arc<TestElement>>) -> Self {
        Self {
            elements,
            selectors: Mutex::new(Vec::new()),
        }
    }
}

impl Dom for TestDom {
    fn select(&self, selector: &str) -> Vec<Arc<dyn VibeElement>> {
        self.selectors.lock().unwrap().push(selector.to_string());
        self.elements
            .iter()
            .map(|e| e.clone() as Arc<dyn VibeElement>)
            .collect()
    }
}

fn engine(provider: Arc<MockProvider>) -> VibeEngine {
    VibeEngine::new(VibeConfig::default().with_shared_provider(provider)).unwrap()
}

#[tokio::test]
async fn init_renders_inline_elements() {
    let provider = Arc::new(MockProvider::new().with_html("<p>generated</p>"));
    let element = TestElement::inline("make a paragraph");
    let dom = TestDom::new(vec![element.clone()]);

    engine(provider).init(&dom).await;

    let writes = element.writes.lock().unwrap().clone();
    assert_eq!(writes.len(), 2);
    assert!(writes[0].contains("Vibing"));
    assert_eq!(writes[1], "<p>generated</p>");
}

#[tokio::test]
async fn init_uses_the_default_selector() {
    let provider = Arc::new(MockProvider::new());
    let dom = TestDom::new(vec![]);

    engine(provider).init(&dom).await;

    let selectors = dom.selectors.lock().unwrap().clone();
    assert_eq!(selectors, vec![DEFAULT_SELECTOR.to_string()]);
}

#[tokio::test]
async fn init_accepts_a_custom_selector() {
    let provider = Arc::new(MockProvider::new());
    let dom = TestDom::new(vec![]);

    engine(provider).init_with_selector(&dom, "[data-custom]").await;

    let selectors = dom.selectors.lock().unwrap().clone();
    assert_eq!(selectors, vec!["[data-custom]".to_string()]);
}

#[tokio::test]
async fn element_without_prompt_gets_the_error_fragment() {
    let provider = Arc::new(MockProvider::new());
    let element = TestElement::empty();
    let dom = TestDom::new(vec![element.clone()]);

    engine(provider.clone()).init(&dom).await;

    let content = element.last_content();
    assert!(content.contains("vibe check failed"));
    assert!(content.contains("no prompt found"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn one_failing_element_does_not_abort_its_siblings() {
    let provider = Arc::new(MockProvider::new().with_html("<p>ok</p>"));
    let broken = TestElement::empty();
    let healthy = TestElement::inline("make a paragraph");
    let dom = TestDom::new(vec![broken.clone(), healthy.clone()]);

    engine(provider).init(&dom).await;

    assert!(broken.last_content().contains("vibe check failed"));
    assert_eq!(healthy.last_content(), "<p>ok</p>");
}

#[tokio::test]
async fn error_callback_replaces_the_fallback_fragment() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in_hook = seen.clone();

    let provider = Arc::new(MockProvider::new());
    let element = TestElement::empty();
    let dom = TestDom::new(vec![element.clone()]);

    let engine = VibeEngine::new(
        VibeConfig::default()
            .with_shared_provider(provider)
            .with_on_error(move |err, _element| {
                seen_in_hook.lock().unwrap().push(err.to_string());
            }),
    )
    .unwrap();
    engine.init(&dom).await;

    let errors = seen.lock().unwrap().clone();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("no prompt found"));
    // Only the loading write happened; the fallback fragment was not used.
    assert_eq!(element.write_count(), 1);
    assert!(element.last_content().contains("Vibing"));
}

#[tokio::test]
async fn custom_loading_markup_is_shown_first() {
    let provider = Arc::new(MockProvider::new().with_html("<p>done</p>"));
    let element = TestElement::inline("anything");
    let dom = TestDom::new(vec![element.clone()]);

    let engine = VibeEngine::new(
        VibeConfig::default()
            .with_shared_provider(provider)
            .with_loading("<p>hold on...</p>"),
    )
    .unwrap();
    engine.init(&dom).await;

    let writes = element.writes.lock().unwrap().clone();
    assert_eq!(writes[0], "<p>hold on...</p>");
    assert_eq!(writes[1], "<p>done</p>");
}

#[tokio::test]
async fn src_attribute_fetches_the_prompt_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hero.vibe"))
        .respond_with(ResponseTemplate::new(200).set_body_string("make a hero banner"))
        .mount(&server)
        .await;

    let provider = Arc::new(
        MockProvider::new().with_response("make a hero banner", "<section>hero</section>"),
    );
    let element = TestElement::with_src(format!("{}/hero.vibe", server.uri()));
    let dom = TestDom::new(vec![element.clone()]);

    engine(provider.clone()).init(&dom).await;

    assert_eq!(element.last_content(), "<section>hero</section>");
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn src_fetch_failure_carries_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.vibe"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let provider = Arc::new(MockProvider::new());
    let element = TestElement::with_src(format!("{}/missing.vibe", server.uri()));
    let dom = TestDom::new(vec![element.clone()]);

    engine(provider.clone()).init(&dom).await;

    let content = element.last_content();
    assert!(content.contains("vibe check failed"));
    assert!(content.contains("404"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn empty_prompt_file_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty.vibe"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let provider = Arc::new(MockProvider::new());
    let element = TestElement::with_src(format!("{}/empty.vibe", server.uri()));
    let dom = TestDom::new(vec![element.clone()]);

    engine(provider.clone()).init(&dom).await;

    assert!(element.last_content().contains("no prompt found"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn boot_builds_an_engine_and_processes_the_page() {
    let provider = Arc::new(MockProvider::new().with_html("<p>booted</p>"));
    let element = TestElement::inline("anything");
    let dom = TestDom::new(vec![element.clone()]);

    let engine = boot(
        VibeConfig::default()
            .with_shared_provider(provider)
            .with_cache(CacheOptions::new().with_storage(StorageKind::Disabled)),
        &dom,
    )
    .await
    .unwrap();

    assert_eq!(element.last_content(), "<p>booted</p>");
    engine.clear_cache();
}

#[tokio::test]
async fn boot_without_provider_fails_before_any_dom_work() {
    let element = TestElement::inline("anything");
    let dom = TestDom::new(vec![element.clone()]);

    let err = boot(VibeConfig::default(), &dom).await.unwrap_err();

    assert!(err.to_string().contains("provider"));
    assert_eq!(element.write_count(), 0);
}
