//! Error types for the vibe engine.

use thiserror::Error;

/// Result type alias for vibe operations.
pub type Result<T> = std::result::Result<T, VibeError>;

/// Main error type for the vibe framework.
#[derive(Debug, Error)]
pub enum VibeError {
    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A generation provider returned an error.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Network request failed.
    #[error("Network error: {0}")]
    Network(String),

    /// No usable prompt could be resolved for an element.
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// A cache storage backend failed. Swallowed at the cache boundary.
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
