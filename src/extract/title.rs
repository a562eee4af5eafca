//! Title extraction
//!
//! Quoted substrings win verbatim. Otherwise the command verb and leading
//! article are stripped, along with the first trailing preposition-led
//! clause ("with John", "at 2pm", "tomorrow"). If nothing survives, a
//! fixed placeholder is used.

use once_cell::sync::Lazy;
use regex::Regex;

const PLACEHOLDER_TITLE: &str = "New Event";

static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]+)"|'([^']+)'"#).expect("valid quoted regex"));

static CALLED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:called|titled|named)\s+(.+)$").expect("valid called regex")
});

static LEAD_COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:please\s+)?(?:schedule|create|add|set\s*up|book|plan|organize|make|new)\s+(?:a|an|the)?\s*")
        .expect("valid lead command regex")
});

static TRAILING_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|\s+)(?:with|at|on|for|from|in|by|to|until|tomorrow|today|tonight|next|this|every)\b.*$")
        .expect("valid trailing clause regex")
});

/// Event title for the utterance
pub fn extract_title(text: &str) -> Option<String> {
    if let Some(caps) = QUOTED.captures(text) {
        let quoted = caps.get(1).or_else(|| caps.get(2))?;
        return Some(quoted.as_str().trim().to_string());
    }

    let candidate = match CALLED.captures(text) {
        Some(caps) => caps.get(1)?.as_str().to_string(),
        None => LEAD_COMMAND.replace(text, "").into_owned(),
    };
    let stripped = TRAILING_CLAUSE.replace(&candidate, "");
    let title = stripped.trim().trim_end_matches(['.', '!', '?', ',']).trim();

    if title.is_empty() {
        Some(PLACEHOLDER_TITLE.to_string())
    } else {
        Some(title.to_string())
    }
}
