// Error types for dlight.
// Covers GitHub API failures, local cache failures, and configuration errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DlightError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Local cache failure. Never surfaced by the repository mediator.
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DlightError>;
