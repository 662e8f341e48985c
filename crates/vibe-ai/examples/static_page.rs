//! Render a tiny in-memory "document" with a canned provider.
//!
//! Run with: cargo run -p vibe-ai --example static_page

use std::sync::{Arc, Mutex};

use vibe_ai::CustomProvider;
use vibe_core::{boot, Dom, VibeConfig, VibeElement};

struct Region {
    prompt: &'static str,
    content: Mutex<String>,
}

impl Region {
    fn new(prompt: &'static str) -> Arc<Self> {
        Arc::new(Self {
            prompt,
            content: Mutex::new(String::new()),
        })
    }
}

impl VibeElement for Region {
    fn inline_text(&self) -> Option<String> {
        Some(self.prompt.to_string())
    }

    fn src(&self) -> Option<String> {
        None
    }

    fn set_content(&self, html: &str) {
        *self.content.lock().unwrap() = html.to_string();
    }
}

struct Page {
    regions: Vec<Arc<Region>>,
}

impl Dom for Page {
    fn select(&self, _selector: &str) -> Vec<Arc<dyn VibeElement>> {
        self.regions
            .iter()
            .map(|r| r.clone() as Arc<dyn VibeElement>)
            .collect()
    }
}

#[tokio::main]
async fn main() -> vibe_core::Result<()> {
    tracing_subscriber::fmt::init();

    let provider = CustomProvider::new(|prompt| async move {
        Ok(format!("<section><h2>{}</h2></section>", prompt))
    })
    .with_name("canned");

    let page = Page {
        regions: vec![
            Region::new("make a hero banner"),
            Region::new("make a pricing table"),
        ],
    };

    boot(VibeConfig::new(provider).with_debug(true), &page).await?;

    for region in &page.regions {
        println!("{}", region.content.lock().unwrap());
    }
    Ok(())
}
