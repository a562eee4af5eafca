//! Recurrence-pattern extraction
//!
//! Triggers only when a recurrence keyword is present. Frequency comes
//! from the keyword, interval from an explicit "every N <unit>" clause,
//! the day-of-week set from "every <weekday>" mentions, day-of-month from
//! "on the Nth", and the terminal condition from "until <date>" or
//! "for N times" (never both).

use super::{datetime::extract_datetime, weekday_from_name};
use crate::types::{Frequency, RecurringPattern};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static TRIGGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:every|each|daily|weekly|monthly|yearly|annually|recurring|repeat(?:ing|s)?)\b")
        .expect("valid recurrence trigger regex")
});

static EVERY_N: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bevery\s+(\d+)\s+(day|week|month|year)s?\b").expect("valid interval regex")
});

static EVERY_OTHER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bevery\s+other\s+(day|week|month|year)\b").expect("valid every-other regex")
});

static DAY_LIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:every|each|on)\s+((?:sunday|monday|tuesday|wednesday|thursday|friday|saturday)(?:(?:\s*,\s*|\s+and\s+)(?:sunday|monday|tuesday|wednesday|thursday|friday|saturday))*)",
    )
    .expect("valid day list regex")
});

static WEEKDAY_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"sunday|monday|tuesday|wednesday|thursday|friday|saturday")
        .expect("valid weekday word regex")
});

static DAY_OF_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bon\s+the\s+(\d{1,2})(?:st|nd|rd|th)\b").expect("valid day-of-month regex")
});

static UNTIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\buntil\s+([^,.;]+)").expect("valid until regex"));

static FOR_N_TIMES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfor\s+(\d+)\s+(?:times|occurrences|occasions)\b").expect("valid occurrences regex")
});

/// Recurrence pattern described by the text
pub fn extract_recurrence(text: &str, now: DateTime<Utc>) -> Option<RecurringPattern> {
    let lowered = text.to_lowercase();
    if !TRIGGER.is_match(&lowered) {
        return None;
    }

    let days_of_week = collect_days(&lowered);

    let (interval, interval_unit) = if let Some(caps) = EVERY_N.captures(&lowered) {
        let n: u32 = caps[1].parse().unwrap_or(1);
        (n.max(1), Some(caps[2].to_string()))
    } else if let Some(caps) = EVERY_OTHER.captures(&lowered) {
        (2, Some(caps[1].to_string()))
    } else {
        (1, None)
    };

    let day_of_month = DAY_OF_MONTH
        .captures(&lowered)
        .and_then(|caps| caps[1].parse::<u8>().ok())
        .filter(|day| (1..=31).contains(day));

    let frequency = match interval_unit.as_deref() {
        Some("day") => Frequency::Daily,
        Some("week") => Frequency::Weekly,
        Some("month") => Frequency::Monthly,
        Some("year") => Frequency::Yearly,
        _ => {
            if lowered.contains("daily") || lowered.contains("every day") {
                Frequency::Daily
            } else if lowered.contains("weekly") || lowered.contains("every week") {
                Frequency::Weekly
            } else if lowered.contains("monthly") || lowered.contains("every month") {
                Frequency::Monthly
            } else if lowered.contains("yearly")
                || lowered.contains("annually")
                || lowered.contains("every year")
            {
                Frequency::Yearly
            } else if days_of_week.is_some() {
                Frequency::Weekly
            } else if day_of_month.is_some() {
                Frequency::Monthly
            } else {
                Frequency::Daily
            }
        }
    };

    // "until <date>" and "for N times" are mutually exclusive; the until
    // clause is checked first
    let end_date = UNTIL
        .captures(&lowered)
        .and_then(|caps| extract_datetime(caps.get(1).map(|m| m.as_str()).unwrap_or(""), now));
    let occurrences = if end_date.is_some() {
        None
    } else {
        FOR_N_TIMES
            .captures(&lowered)
            .and_then(|caps| caps[1].parse::<u32>().ok())
    };

    Some(RecurringPattern {
        frequency,
        interval,
        days_of_week,
        day_of_month,
        end_date,
        occurrences,
    })
}

fn collect_days(lowered: &str) -> Option<Vec<u8>> {
    let mut days: Vec<u8> = Vec::new();
    for caps in DAY_LIST.captures_iter(lowered) {
        if let Some(list) = caps.get(1) {
            for word in WEEKDAY_WORD.find_iter(list.as_str()) {
                if let Some(day) = weekday_from_name(word.as_str()) {
                    days.push(day);
                }
            }
        }
    }
    if days.is_empty() {
        return None;
    }
    days.sort_unstable();
    days.dedup();
    Some(days)
}
