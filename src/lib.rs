//! Kairos - Natural-Language Calendar Command Interpretation
//!
//! A command interpretation pipeline that converts free-form utterances
//! ("Schedule a meeting with John tomorrow at 2pm") into typed,
//! confidence-scored calendar commands:
//! - Two-tier parsing: a remote language-model call with a deterministic
//!   local fallback
//! - Temporal-expression resolution relative to a reference instant
//! - Recurrence-pattern extraction
//! - Time-bounded memoization of parse results
//!
//! # Architecture
//!
//! The pipeline is organized leaves-first:
//! - **Temporal**: pure calendar arithmetic everything else calls into
//! - **Extract**: one pure extractor per entity kind
//! - **Intent**: ordered first-match-wins classification
//! - **Fallback**: fully-offline composition of the above
//! - **Llm**: the remote completion client with retry and cool-down
//! - **Parser**: the facade deciding cache vs. remote vs. fallback
//!
//! # Example
//!
//! ```ignore
//! use kairos_core::{CommandParser, NlpConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let parser = CommandParser::new(NlpConfig::from_env())?;
//!     let command = parser
//!         .parse_command("Schedule a meeting with John tomorrow at 2pm")
//!         .await?;
//!     println!("{} at {:?}", command.intent, command.entities.date_time);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod intent;
pub mod llm;
pub mod parser;
pub mod temporal;
pub mod types;

// Re-export commonly used types
pub use cache::{spawn_sweeper, CacheStats, ParseCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::NlpConfig;
pub use error::{KairosError, Result};
pub use llm::{LlmParser, RateLimitState};
pub use parser::CommandParser;
pub use types::{
    CommandIntent, ExtractedEntities, Frequency, ParsedCommand, RecurringPattern, ReminderType,
    TimeRange,
};
