//! Reminder extraction
//!
//! The reminder instant comes from the date/time extractor; the delivery
//! channel from keyword presence, defaulting to push.

use super::datetime::extract_datetime;
use crate::types::ReminderType;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:by\s+)?e-?mail\b").expect("valid email keyword regex"));

static SMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:sms|text(?:\s+message)?)\b").expect("valid sms keyword regex"));

/// Instant the reminder should fire
pub fn extract_reminder_time(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    extract_datetime(text, now)
}

/// Delivery channel for the reminder
pub fn extract_reminder_type(text: &str) -> ReminderType {
    let lowered = text.to_lowercase();
    if EMAIL.is_match(&lowered) {
        ReminderType::Email
    } else if SMS.is_match(&lowered) {
        ReminderType::Sms
    } else {
        ReminderType::Push
    }
}
