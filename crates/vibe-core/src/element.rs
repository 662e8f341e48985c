//! Vibe elements and the host document seam.
//!
//! The engine never touches a real document tree. Hosts implement these
//! traits over whatever representation they have; the engine only reads a
//! prompt source and pushes markup back through the sink.

use std::sync::Arc;

/// Selector used by [`crate::VibeEngine::init`]: the dedicated tag name or
/// the marker attribute.
pub const DEFAULT_SELECTOR: &str = "vibe-component, [data-vibe]";

/// A document node marked for generative rendering.
///
/// The content sink carries the script re-execution obligation: assigning
/// markup does not run embedded scripts in any DOM implementation, so
/// `set_content` must replace each `<script>` tag with a freshly created
/// node carrying the same attributes and text.
pub trait VibeElement: Send + Sync {
    /// The element's inline prompt text, if any.
    fn inline_text(&self) -> Option<String>;

    /// The element's `src` attribute: the URL of an external prompt file.
    fn src(&self) -> Option<String>;

    /// Replace the element's content with `html`, forcing embedded
    /// `<script>` execution.
    fn set_content(&self, html: &str);
}

/// The host document: the engine's only way to find vibe elements.
pub trait Dom: Send + Sync {
    /// All elements matching `selector`.
    fn select(&self, selector: &str) -> Vec<Arc<dyn VibeElement>>;
}
