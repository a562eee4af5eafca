//! Command parsing facade
//!
//! The single entry point external callers use. Decides cache vs. remote
//! vs. local fallback and always returns a uniform `ParsedCommand`: any
//! failure on the remote path is converted into a fallback parse, so the
//! only error callers can see is a precondition violation on the input.

use crate::cache::ParseCache;
use crate::clock::{Clock, SystemClock};
use crate::config::NlpConfig;
use crate::error::{KairosError, Result};
use crate::fallback;
use crate::llm::{LlmParser, RateLimitState};
use crate::types::ParsedCommand;
use std::sync::Arc;
use tracing::{debug, warn};

/// Facade over the two parsing strategies and the parse cache
///
/// Owns the cache and the rate-limit cool-down for the process lifetime.
pub struct CommandParser {
    config: NlpConfig,
    cache: Arc<ParseCache>,
    limiter: Arc<RateLimitState>,
    llm: Option<LlmParser>,
    clock: Arc<dyn Clock>,
}

impl CommandParser {
    /// Build a parser on the system clock
    pub fn new(config: NlpConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build a parser on an injected clock (tests simulate elapsed time)
    pub fn with_clock(config: NlpConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let limiter = Arc::new(RateLimitState::new());
        let llm = if config.remote_enabled() {
            Some(LlmParser::new(
                config.clone(),
                limiter.clone(),
                clock.clone(),
            )?)
        } else {
            debug!("no LLM credential configured, using local parsing only");
            None
        };

        Ok(Self {
            cache: Arc::new(ParseCache::new(clock.clone())),
            config,
            limiter,
            llm,
            clock,
        })
    }

    /// The process-wide parse cache, exposed for sweeper wiring and tests
    pub fn cache(&self) -> &Arc<ParseCache> {
        &self.cache
    }

    /// Parse an utterance into a typed, confidence-scored command
    ///
    /// Empty input is a precondition violation and the only condition
    /// under which this returns an error; every parse failure degrades to
    /// the local fallback instead.
    pub async fn parse_command(&self, text: &str) -> Result<ParsedCommand> {
        if text.trim().is_empty() {
            return Err(KairosError::InvalidInput("input text is empty".to_string()));
        }

        let key = ParseCache::key_for(text);
        if let Some(hit) = self.cache.get(&key) {
            debug!(%key, "parse cache hit");
            return Ok(hit);
        }

        let now = self.clock.now();
        let result = match &self.llm {
            Some(llm) if !self.limiter.active_at(now) => match llm.parse(text, now).await {
                Ok(command) => command,
                Err(err) => {
                    warn!("remote parse failed, falling back to local parser: {err}");
                    fallback::parse_locally(text, now)
                }
            },
            Some(_) => {
                debug!("rate-limit cool-down in effect, skipping remote parser");
                fallback::parse_locally(text, now)
            }
            None => fallback::parse_locally(text, now),
        };

        self.cache
            .set(&key, result.clone(), self.config.cache_ttl_secs);
        Ok(result)
    }
}
