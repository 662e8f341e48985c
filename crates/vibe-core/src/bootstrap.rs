//! One-call startup for hosts that want the default behavior.
//!
//! The browser-embedded ancestor of this engine booted from an ambient
//! global read at page load; here the caller builds the configuration,
//! hands over the document explicitly, and owns the returned engine.

use crate::config::VibeConfig;
use crate::element::Dom;
use crate::engine::VibeEngine;
use crate::Result;

/// Build an engine from `config` and process the document's default vibe
/// elements. Configuration errors surface before any document work.
pub async fn boot(config: VibeConfig, dom: &dyn Dom) -> Result<VibeEngine> {
    let engine = VibeEngine::new(config)?;
    engine.init(dom).await;
    Ok(engine)
}
