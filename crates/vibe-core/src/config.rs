//! Engine configuration.
//!
//! A [`VibeConfig`] is assembled by the caller, validated once when the
//! engine is constructed, and immutable afterwards.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{DiskStorage, MemoryStorage, Storage, VibeCache, DEFAULT_TTL};
use crate::element::VibeElement;
use crate::provider::VibeProvider;
use crate::VibeError;

/// Callback invoked when a per-element pipeline fails.
pub type ErrorHook = Arc<dyn Fn(&VibeError, &dyn VibeElement) + Send + Sync>;

/// Which backend the cache persists entries into.
#[derive(Debug, Clone)]
pub enum StorageKind {
    /// One JSON file per entry under the given directory.
    Disk(PathBuf),
    /// Process-lifetime in-memory map.
    Memory,
    /// No caching: every lookup misses.
    Disabled,
}

/// Cache tuning: entry time-to-live and backend selection.
#[derive(Debug, Clone)]
pub struct CacheOptions {
    pub ttl: Duration,
    pub storage: StorageKind,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            storage: StorageKind::Memory,
        }
    }
}

impl CacheOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry time-to-live.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Select the storage backend.
    pub fn with_storage(mut self, storage: StorageKind) -> Self {
        self.storage = storage;
        self
    }

    /// Build the cache this configuration describes.
    pub(crate) fn build(&self) -> VibeCache {
        let storage: Option<Arc<dyn Storage>> = match &self.storage {
            StorageKind::Disk(dir) => Some(Arc::new(DiskStorage::new(dir.clone()))),
            StorageKind::Memory => Some(Arc::new(MemoryStorage::new())),
            StorageKind::Disabled => None,
        };
        VibeCache::new(storage, self.ttl)
    }
}

/// Engine configuration.
///
/// # Example
///
/// ```rust,ignore
/// let config = VibeConfig::new(provider)
///     .with_cache(CacheOptions::new().with_ttl(Duration::from_secs(3600)))
///     .with_loading("<p>hold on...</p>")
///     .with_debug(true);
/// ```
#[derive(Clone, Default)]
pub struct VibeConfig {
    /// The generation provider. Required; construction fails without one.
    pub provider: Option<Arc<dyn VibeProvider>>,

    /// Cache tuning.
    pub cache: CacheOptions,

    /// Markup shown while an element's generation is in flight.
    pub loading: Option<String>,

    /// Route per-element failures to a callback instead of inline markup.
    pub on_error: Option<ErrorHook>,

    /// Toggle verbose per-request logging.
    pub debug: bool,
}

impl VibeConfig {
    /// Start a configuration around the given provider.
    pub fn new(provider: impl VibeProvider + 'static) -> Self {
        Self::default().with_provider(provider)
    }

    /// Set the provider.
    pub fn with_provider(mut self, provider: impl VibeProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Set an already-shared provider handle. Useful when the caller keeps
    /// its own reference, e.g. to inspect a test double.
    pub fn with_shared_provider(mut self, provider: Arc<dyn VibeProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the cache options.
    pub fn with_cache(mut self, cache: CacheOptions) -> Self {
        self.cache = cache;
        self
    }

    /// Override the loading markup.
    pub fn with_loading(mut self, markup: impl Into<String>) -> Self {
        self.loading = Some(markup.into());
        self
    }

    /// Set the error callback.
    pub fn with_on_error(
        mut self,
        hook: impl Fn(&VibeError, &dyn VibeElement) + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Enable or disable verbose logging.
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }
}
