//! Prompt-keyed HTML cache over pluggable storage backends.
//!
//! Entries are JSON blobs under prefixed keys so the cache can share a
//! backend with unrelated data. Lookups lazily evict expired entries;
//! writes are best-effort and never fail the caller.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Result;

/// Prefix on every cache key, so `clear` cannot touch unrelated entries
/// in a shared backend.
pub const STORAGE_PREFIX: &str = "vibe:";

/// Default time-to-live for cache entries: 24 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// Hash a prompt into a short, stable cache key.
///
/// djb2-style rolling hash over the UTF-16 code units of the input with
/// 32-bit unsigned wraparound, rendered in base 36. Collisions are
/// tolerated: the worst case is a wrong hit for a pathological prompt pair.
pub fn hash_prompt(input: &str) -> String {
    let mut hash: u32 = 5381;
    for unit in input.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_add(hash)
            .wrapping_add(u32::from(unit));
    }
    to_base36(hash)
}

fn to_base36(mut value: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(char::from_digit(value % 36, 36).unwrap_or('0'));
        value /= 36;
    }
    digits.iter().rev().collect()
}

/// One stored generation: the markup plus its storage timestamp (epoch ms).
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    html: String,
    ts: u64,
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// A key/value backend the cache persists entries into.
///
/// The surface is deliberately narrow; backends may hold unrelated data,
/// which is why every cache key carries [`STORAGE_PREFIX`].
pub trait Storage: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key` if present.
    fn remove_item(&self, key: &str);

    /// All keys currently present in the backend.
    fn keys(&self) -> Vec<String>;
}

/// Session-scoped storage: lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.entries.remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }
}

/// Persistent storage: one JSON file per key under a directory.
///
/// The directory is created on first write. Keys map 1:1 to file names.
#[derive(Debug)]
pub struct DiskStorage {
    dir: PathBuf,
}

impl DiskStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl Storage for DiskStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        let _ = std::fs::remove_file(self.path_for(key));
    }

    fn keys(&self) -> Vec<String> {
        match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .filter_map(|e| e.file_name().into_string().ok())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Prompt cache with per-entry expiration.
///
/// `get` and `set` never fail: a missing, expired, or unreadable entry is
/// a miss, and a failed write degrades to an uncached generation.
pub struct VibeCache {
    storage: Option<Arc<dyn Storage>>,
    ttl: Duration,
}

impl VibeCache {
    /// Create a cache over the given backend. `None` disables caching.
    pub fn new(storage: Option<Arc<dyn Storage>>, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    /// Create a disabled cache: every lookup misses, writes are no-ops.
    pub fn disabled() -> Self {
        Self::new(None, DEFAULT_TTL)
    }

    /// Look up `key`, deleting the entry as a side effect when expired.
    pub fn get(&self, key: &str) -> Option<String> {
        let storage = self.storage.as_ref()?;
        let full_key = format!("{}{}", STORAGE_PREFIX, key);
        let raw = storage.get_item(&full_key)?;
        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(_) => return None,
        };
        let age = now_millis().saturating_sub(entry.ts);
        if age > self.ttl.as_millis() as u64 {
            storage.remove_item(&full_key);
            return None;
        }
        Some(entry.html)
    }

    /// Store `html` under `key`. Backend failures are logged and swallowed.
    pub fn set(&self, key: &str, html: &str) {
        let storage = match self.storage.as_ref() {
            Some(storage) => storage,
            None => return,
        };
        let entry = CacheEntry {
            html: html.to_string(),
            ts: now_millis(),
        };
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("failed to encode cache entry: {}", err);
                return;
            }
        };
        if let Err(err) = storage.set_item(&format!("{}{}", STORAGE_PREFIX, key), &raw) {
            warn!("cache write failed, skipping: {}", err);
        }
    }

    /// Remove every prefixed entry, leaving unrelated keys untouched.
    pub fn clear(&self) {
        let storage = match self.storage.as_ref() {
            Some(storage) => storage,
            None => return,
        };
        for key in storage.keys() {
            if key.starts_with(STORAGE_PREFIX) {
                storage.remove_item(&key);
            }
        }
    }
}
