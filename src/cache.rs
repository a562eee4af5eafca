//! Time-bounded parse cache
//!
//! Memoizes parse results keyed by normalized input text. Expiry is both
//! pull-based (an expired entry is deleted and reported absent on `get`)
//! and push-based (a periodic sweep), since the sweep interval is coarser
//! than an individual TTL. Entries are replaced, never mutated; the last
//! writer for a key wins.

use crate::clock::Clock;
use crate::types::ParsedCommand;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// A cached parse with its expiry bookkeeping
#[derive(Debug, Clone)]
struct CacheEntry {
    data: ParsedCommand,
    timestamp: DateTime<Utc>,
    ttl: Duration,
}

impl CacheEntry {
    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now <= self.timestamp + self.ttl
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Entries currently stored, valid or not
    pub size: usize,

    /// Stored entries that have already expired
    pub expired: usize,
}

/// TTL-bounded map from normalized input text to parse results
pub struct ParseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl ParseCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Cache key for an utterance: `"nlp:"` plus the lowercased, trimmed text
    pub fn key_for(text: &str) -> String {
        format!("nlp:{}", text.trim().to_lowercase())
    }

    /// Fetch a live entry; an expired one is deleted and reported absent
    pub fn get(&self, key: &str) -> Option<ParsedCommand> {
        let now = self.clock.now();
        let expired = {
            let entries = self.entries.read().ok()?;
            match entries.get(key) {
                Some(entry) if entry.is_valid(now) => return Some(entry.data.clone()),
                Some(_) => true,
                None => false,
            }
        };
        if expired {
            if let Ok(mut entries) = self.entries.write() {
                entries.remove(key);
            }
        }
        None
    }

    /// Store a parse result; always replaces any existing entry
    pub fn set(&self, key: &str, value: ParsedCommand, ttl_secs: u64) {
        let entry = CacheEntry {
            data: value,
            timestamp: self.clock.now(),
            ttl: Duration::seconds(ttl_secs as i64),
        };
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), entry);
        }
    }

    /// Remove a single entry, reporting whether it existed
    pub fn delete(&self, key: &str) -> bool {
        self.entries
            .write()
            .map(|mut entries| entries.remove(key).is_some())
            .unwrap_or(false)
    }

    /// Drop every expired entry; returns how many were removed
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        if let Ok(mut entries) = self.entries.write() {
            let before = entries.len();
            entries.retain(|_, entry| entry.is_valid(now));
            before - entries.len()
        } else {
            0
        }
    }

    /// Drop everything
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        if let Ok(entries) = self.entries.read() {
            let expired = entries
                .values()
                .filter(|entry| !entry.is_valid(now))
                .count();
            CacheStats {
                size: entries.len(),
                expired,
            }
        } else {
            CacheStats {
                size: 0,
                expired: 0,
            }
        }
    }
}

/// Run the push-based expiry sweep on a fixed period
pub fn spawn_sweeper(
    cache: Arc<ParseCache>,
    period: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = cache.sweep();
            if removed > 0 {
                debug!(removed, "parse cache sweep");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::types::{CommandIntent, ExtractedEntities};

    fn command(text: &str) -> ParsedCommand {
        ParsedCommand {
            intent: CommandIntent::CreateEvent,
            entities: ExtractedEntities::default(),
            confidence: 0.6,
            original_text: text.to_string(),
        }
    }

    fn cache_with_clock() -> (Arc<ManualClock>, ParseCache) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = ParseCache::new(clock.clone());
        (clock, cache)
    }

    #[test]
    fn test_key_normalization() {
        assert_eq!(
            ParseCache::key_for("  Schedule Lunch  "),
            "nlp:schedule lunch"
        );
        assert_eq!(
            ParseCache::key_for("schedule lunch"),
            ParseCache::key_for("SCHEDULE LUNCH")
        );
    }

    #[test]
    fn test_round_trip() {
        let (_clock, cache) = cache_with_clock();
        let value = command("lunch with sam");
        cache.set("nlp:lunch with sam", value.clone(), 3600);
        assert_eq!(cache.get("nlp:lunch with sam"), Some(value));
        assert_eq!(cache.get("nlp:other"), None);
    }

    #[test]
    fn test_pull_based_expiry_deletes_entry() {
        let (clock, cache) = cache_with_clock();
        cache.set("k", command("x"), 60);

        clock.advance(Duration::seconds(61));
        assert_eq!(cache.get("k"), None);
        // The expired entry was removed, not just hidden
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let (clock, cache) = cache_with_clock();
        cache.set("short", command("a"), 10);
        cache.set("long", command("b"), 3600);

        clock.advance(Duration::seconds(30));
        assert_eq!(cache.sweep(), 1);
        assert!(cache.get("long").is_some());
        assert!(cache.get("short").is_none());
    }

    #[test]
    fn test_set_replaces_entry() {
        let (_clock, cache) = cache_with_clock();
        cache.set("k", command("first"), 3600);
        cache.set("k", command("second"), 3600);
        assert_eq!(cache.get("k").unwrap().original_text, "second");
        assert_eq!(cache.stats().size, 1);
    }

    #[test]
    fn test_delete_and_clear() {
        let (_clock, cache) = cache_with_clock();
        cache.set("k", command("x"), 3600);
        assert!(cache.delete("k"));
        assert!(!cache.delete("k"));

        cache.set("a", command("x"), 3600);
        cache.set("b", command("y"), 3600);
        cache.clear();
        assert_eq!(cache.stats().size, 0);
    }

    #[tokio::test]
    async fn test_sweeper_task_runs() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = Arc::new(ParseCache::new(clock.clone()));
        cache.set("k", command("x"), 1);
        clock.advance(Duration::seconds(5));

        let handle = spawn_sweeper(cache.clone(), std::time::Duration::from_millis(10));
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        handle.abort();

        assert_eq!(cache.stats().size, 0);
    }
}
