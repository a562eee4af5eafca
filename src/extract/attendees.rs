//! Attendee extraction
//!
//! Matches "with NAME[, NAME...][ and NAME]" clauses and independent
//! "invite/add NAME" clauses, merges both, and deduplicates while keeping
//! first-seen order. Capitalized date words a greedy name pattern might
//! swallow ("With Tomorrow") are filtered out.

use super::WEEKDAY_NAMES;
use once_cell::sync::Lazy;
use regex::Regex;

static WITH_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[Ww]ith|w/)\s+([A-Z][a-zA-Z]+(?:(?:\s*,\s*|\s+[Aa]nd\s+)[A-Z][a-zA-Z]+)*)")
        .expect("valid with-clause regex")
});

static INVITE_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[Ii]nvite|[Aa]dd)\s+([A-Z][a-zA-Z]+(?:(?:\s*,\s*|\s+[Aa]nd\s+)[A-Z][a-zA-Z]+)*)")
        .expect("valid invite-clause regex")
});

static NAME_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*,\s*|\s+[Aa]nd\s+").expect("valid name split regex"));

const NON_NAME_WORDS: [&str; 10] = [
    "today",
    "tomorrow",
    "tonight",
    "yesterday",
    "noon",
    "midnight",
    "everyone",
    "morning",
    "afternoon",
    "evening",
];

/// Ordered, deduplicated attendee names mentioned in the text
pub fn extract_attendees(text: &str) -> Option<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    for clause in [&WITH_CLAUSE, &INVITE_CLAUSE] {
        for caps in clause.captures_iter(text) {
            if let Some(list) = caps.get(1) {
                for name in NAME_SPLIT.split(list.as_str()) {
                    push_name(&mut names, name);
                }
            }
        }
    }
    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}

fn push_name(names: &mut Vec<String>, candidate: &str) {
    let candidate = candidate.trim();
    if candidate.is_empty() || !is_person_name(candidate) {
        return;
    }
    let seen = names
        .iter()
        .any(|existing| existing.eq_ignore_ascii_case(candidate));
    if !seen {
        names.push(candidate.to_string());
    }
}

fn is_person_name(candidate: &str) -> bool {
    let lowered = candidate.to_lowercase();
    !WEEKDAY_NAMES.contains(&lowered.as_str())
        && !NON_NAME_WORDS.contains(&lowered.as_str())
        && super::month_from_name(&lowered).is_none()
}
