//! Location extraction
//!
//! Matches "at/in <Capitalized phrase>" up to the next clause boundary
//! (the capitalized run ends at the first lowercase word). Candidates
//! that are themselves date/time expressions are rejected.

use super::WEEKDAY_NAMES;
use once_cell::sync::Lazy;
use regex::Regex;

static AT_PLACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[Aa]t|[Ii]n)\s+(?:the\s+)?([A-Z][A-Za-z0-9']*(?:\s+(?:[A-Z][A-Za-z0-9']*|\d+[A-Za-z]*))*)")
        .expect("valid location regex")
});

const NON_PLACE_WORDS: [&str; 6] = ["today", "tomorrow", "tonight", "noon", "midnight", "next"];

/// Location phrase mentioned in the text
pub fn extract_location(text: &str) -> Option<String> {
    for caps in AT_PLACE.captures_iter(text) {
        let candidate = caps.get(1)?.as_str().trim();
        if !is_temporal_phrase(candidate) {
            return Some(candidate.to_string());
        }
    }
    None
}

fn is_temporal_phrase(candidate: &str) -> bool {
    let first = candidate
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase();
    let first = first.trim_end_matches("'s").to_string();
    WEEKDAY_NAMES.contains(&first.as_str())
        || NON_PLACE_WORDS.contains(&first.as_str())
        || super::month_from_name(&first).is_some()
        || first.chars().next().is_some_and(|c| c.is_ascii_digit())
}
