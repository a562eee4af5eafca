//! Error types for the Kairos command pipeline
//!
//! This module provides error handling using thiserror for structured error
//! definitions and anyhow for error propagation at the binary boundary.

use thiserror::Error;

/// Main error type for Kairos operations
#[derive(Error, Debug)]
pub enum KairosError {
    /// Caller passed input that violates a precondition (e.g. empty text)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM API request failed (retryable: network, 5xx, malformed payload)
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// LLM endpoint rejected the request (non-retryable 4xx)
    #[error("LLM request rejected (status {status}): {message}")]
    LlmRejected { status: u16, message: String },

    /// LLM endpoint is rate limiting us
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Kairos operations
pub type Result<T> = std::result::Result<T, KairosError>;

/// Convert anyhow::Error to KairosError
impl From<anyhow::Error> for KairosError {
    fn from(err: anyhow::Error) -> Self {
        KairosError::Other(err.to_string())
    }
}
