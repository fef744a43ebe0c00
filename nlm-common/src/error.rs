//! Error types for the NLM chat gateway.

use thiserror::Error;

/// Result type alias using the gateway error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for gateway startup and configuration paths.
///
/// Per-turn failures (network, upstream status, malformed bodies) are
/// modeled separately in the gateway crate and recovered into user-facing
/// reply text; this type covers the paths that may legitimately abort
/// startup.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
