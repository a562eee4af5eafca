//! Time-range extraction
//!
//! Recognizes named ranges ("today", "this week", "next month") and
//! computes the corresponding start/end pair. A single resolved date/time
//! with no named range is treated as a full-day range.

use super::{datetime::extract_datetime, days_until_weekday, weekday_from_name};
use crate::temporal::{self, CalendarUnit, TimeUnit};
use crate::types::TimeRange;
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static ANY_WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:next\s+|this\s+|on\s+|for\s+)?(sunday|monday|tuesday|wednesday|thursday|friday|saturday)\b")
        .expect("valid weekday-range regex")
});

/// Query range covered by the text
pub fn extract_time_range(text: &str, now: DateTime<Utc>) -> Option<TimeRange> {
    let lowered = text.to_lowercase();

    if lowered.contains("today") || lowered.contains("tonight") {
        return day_range(now);
    }
    if lowered.contains("tomorrow") {
        return day_range(now + Duration::days(1));
    }
    if lowered.contains("yesterday") {
        return day_range(now - Duration::days(1));
    }
    if lowered.contains("this week") {
        return unit_range(now, CalendarUnit::Week);
    }
    if lowered.contains("next week") {
        return unit_range(now + Duration::weeks(1), CalendarUnit::Week);
    }
    if lowered.contains("this month") {
        return unit_range(now, CalendarUnit::Month);
    }
    if lowered.contains("next month") {
        return unit_range(
            temporal::add_interval(now, 1, TimeUnit::Months),
            CalendarUnit::Month,
        );
    }
    if lowered.contains("this year") {
        return unit_range(now, CalendarUnit::Year);
    }
    if lowered.contains("next year") {
        return unit_range(
            temporal::add_interval(now, 1, TimeUnit::Years),
            CalendarUnit::Year,
        );
    }
    if let Some(caps) = ANY_WEEKDAY.captures(&lowered) {
        if let Some(target) = weekday_from_name(caps.get(1)?.as_str()) {
            let offset = days_until_weekday(temporal::weekday_index(now), target);
            return day_range(now + Duration::days(offset));
        }
    }

    // No named range; a single resolved instant covers its whole day
    extract_datetime(text, now).and_then(day_range)
}

fn day_range(instant: DateTime<Utc>) -> Option<TimeRange> {
    TimeRange::new(
        temporal::start_of(instant, CalendarUnit::Day),
        temporal::end_of(instant, CalendarUnit::Day),
    )
}

fn unit_range(instant: DateTime<Utc>, unit: CalendarUnit) -> Option<TimeRange> {
    TimeRange::new(temporal::start_of(instant, unit), temporal::end_of(instant, unit))
}
