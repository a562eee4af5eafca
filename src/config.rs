//! Configuration for the command pipeline
//!
//! The remote parsing path is attempted only when an API key is present;
//! everything else has compiled-in defaults suitable for production.

use std::env;

/// Configuration for the command pipeline
#[derive(Debug, Clone)]
pub struct NlpConfig {
    /// Bearer token for the completion endpoint; absence disables the
    /// remote path entirely
    pub api_key: Option<String>,

    /// Base URL of the completion endpoint
    pub base_url: String,

    /// Model to use
    pub model: String,

    /// Temperature for sampling, kept low for deterministic extraction
    pub temperature: f32,

    /// Max tokens for responses
    pub max_tokens: u32,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Total attempts per parse, including the first
    pub max_retries: u32,

    /// Base delay for linear backoff (attempt number times this)
    pub backoff_base_ms: u64,

    /// Cool-down applied after a 429 without a Retry-After header
    pub cooldown_secs: u64,

    /// Parse cache TTL in seconds
    pub cache_ttl_secs: u64,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.1,
            max_tokens: 500,
            request_timeout_secs: 10,
            max_retries: 3,
            backoff_base_ms: 1000,
            cooldown_secs: 60,
            cache_ttl_secs: 3600,
        }
    }
}

impl NlpConfig {
    /// Build a config from the environment
    ///
    /// Reads `OPENAI_API_KEY`, and optionally `KAIROS_LLM_BASE_URL` and
    /// `KAIROS_LLM_MODEL` to point at a compatible endpoint.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        if let Ok(url) = env::var("KAIROS_LLM_BASE_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        if let Ok(model) = env::var("KAIROS_LLM_MODEL") {
            if !model.is_empty() {
                config.model = model;
            }
        }
        config
    }

    /// Whether the remote parsing path should be attempted at all
    pub fn remote_enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}
