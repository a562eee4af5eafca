//! Duration extraction
//!
//! Matches explicit hour/minute quantities, converting hours (including
//! fractional ones) to minutes. Hour clauses are scanned before minute
//! clauses, so when both appear the hour quantity is authoritative.
//!
//! When no explicit duration is present but the utterance resolved a
//! date/time and mentions a generic meeting noun, the conventional
//! 60-minute default applies.

use once_cell::sync::Lazy;
use regex::Regex;

static HOURS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d+(?:\.\d+)?)[-\s]?(?:hours?|hrs?)\b").expect("valid hours regex")
});

static MINUTES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d+)[-\s]?(?:minutes?|mins?)\b").expect("valid minutes regex")
});

static HALF_HOUR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bhalf\s+(?:an\s+)?hour\b").expect("valid half-hour regex"));

static AN_HOUR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\ban\s+hour\b").expect("valid an-hour regex"));

static GENERIC_EVENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:meeting|appointment|call|session|sync|standup|catch[- ]?up)\b")
        .expect("valid generic event regex")
});

/// Event length in minutes
///
/// `has_datetime` reports whether the date/time extractor resolved an
/// instant for the same utterance; it gates the 60-minute default.
pub fn extract_duration(text: &str, has_datetime: bool) -> Option<u32> {
    let lowered = text.to_lowercase();

    for caps in HOURS.captures_iter(&lowered) {
        // "in 2 hours" is a date anchor, not a duration
        if led_by_in(&lowered, caps.get(0).map(|m| m.start()).unwrap_or(0)) {
            continue;
        }
        if let Ok(hours) = caps[1].parse::<f64>() {
            return Some((hours * 60.0).round() as u32);
        }
    }
    for caps in MINUTES.captures_iter(&lowered) {
        if led_by_in(&lowered, caps.get(0).map(|m| m.start()).unwrap_or(0)) {
            continue;
        }
        if let Ok(minutes) = caps[1].parse::<u32>() {
            return Some(minutes);
        }
    }
    if HALF_HOUR.is_match(&lowered) {
        return Some(30);
    }
    if AN_HOUR.is_match(&lowered) {
        return Some(60);
    }

    if has_datetime && GENERIC_EVENT.is_match(&lowered) {
        return Some(60);
    }
    None
}

fn led_by_in(lowered: &str, match_start: usize) -> bool {
    lowered[..match_start]
        .split_whitespace()
        .last()
        .is_some_and(|word| word == "in" || word == "within")
}
