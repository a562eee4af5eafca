//! Contact-name extraction
//!
//! Matches "contact/person named NAME" forms, possessive "NAME's
//! email/phone" forms, and "add NAME to contacts".

use once_cell::sync::Lazy;
use regex::Regex;

static NAMED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:(?i:contact|person|someone)\s+(?i:named|called)\s+)([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)?)")
        .expect("valid named-contact regex")
});

static POSSESSIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)?)(?:'s|s')\s+(?i:email|phone|number|address|contact|info)")
        .expect("valid possessive-contact regex")
});

static ADD_TO_CONTACTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:add|save)\s+([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)?)\s+(?i:to\s+(?:my\s+)?contacts)\b")
        .expect("valid add-to-contacts regex")
});

/// Contact name referenced in the text
pub fn extract_contact_name(text: &str) -> Option<String> {
    for pattern in [&NAMED, &POSSESSIVE, &ADD_TO_CONTACTS] {
        if let Some(caps) = pattern.captures(text) {
            if let Some(name) = caps.get(1) {
                return Some(name.as_str().to_string());
            }
        }
    }
    None
}
