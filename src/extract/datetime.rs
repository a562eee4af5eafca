//! Date/time extraction
//!
//! Scans for explicit time-of-day expressions ("at 2pm", "14:00") and
//! separately for date-anchoring expressions ("tomorrow", "next Friday",
//! "in 3 days", "on 5/12"), then composes the two. If only a time-of-day
//! is found, it anchors to the reference day.

use super::{days_until_weekday, month_from_name, weekday_from_name};
use crate::temporal::{self, CalendarUnit, TimeUnit};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static TIME_12H: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})(?::(\d{2}))?\s*([ap])\.?m\.?\b").expect("valid 12h time regex")
});

static TIME_24H: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)\b").expect("valid 24h time regex"));

static NEXT_WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bnext\s+(sunday|monday|tuesday|wednesday|thursday|friday|saturday)\b")
        .expect("valid next-weekday regex")
});

static WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:this\s+|on\s+)?(sunday|monday|tuesday|wednesday|thursday|friday|saturday)\b")
        .expect("valid weekday regex")
});

static IN_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bin\s+(\d+)\s+(minute|hour|day|week|month|year)s?\b")
        .expect("valid relative offset regex")
});

static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:on\s+)?(\d{1,2})/(\d{1,2})(?:/(\d{2,4}))?\b").expect("valid numeric date regex")
});

static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:on\s+)?(january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\.?\s+(\d{1,2})(?:st|nd|rd|th)?\b",
    )
    .expect("valid month-day regex")
});

/// Resolve an explicit date and/or time mentioned in the text, relative to
/// `now`. Returns `None` when the text carries no date or time cue at all.
pub fn extract_datetime(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let lowered = text.to_lowercase();
    let anchor = extract_date_anchor(&lowered, now);
    let time_of_day = extract_time_of_day(&lowered);

    match (anchor, time_of_day) {
        (None, None) => None,
        (Some(anchored), None) => Some(anchored),
        (anchored, Some((hour, minute))) => {
            let base = anchored.unwrap_or(now);
            Some(
                temporal::start_of(base, CalendarUnit::Day)
                    + Duration::hours(hour as i64)
                    + Duration::minutes(minute as i64),
            )
        }
    }
}

/// Explicit time-of-day as (hour, minute) in 24-hour form
pub(crate) fn extract_time_of_day(lowered: &str) -> Option<(u32, u32)> {
    if let Some(caps) = TIME_12H.captures(lowered) {
        let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = caps
            .get(2)
            .map(|m| m.as_str().parse().unwrap_or(0))
            .unwrap_or(0);
        let meridiem = caps.get(3)?.as_str();
        // "pm" adds 12 unless the hour already is; "12am" maps to 0
        if meridiem == "p" && hour < 12 {
            hour += 12;
        } else if meridiem == "a" && hour == 12 {
            hour = 0;
        }
        if hour < 24 && minute < 60 {
            return Some((hour, minute));
        }
    }
    if let Some(caps) = TIME_24H.captures(lowered) {
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
        return Some((hour, minute));
    }
    if lowered.contains("noon") {
        return Some((12, 0));
    }
    if lowered.contains("midnight") {
        return Some((0, 0));
    }
    None
}

fn extract_date_anchor(lowered: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if lowered.contains("day after tomorrow") {
        return Some(now + Duration::days(2));
    }
    if lowered.contains("tomorrow") {
        return Some(now + Duration::days(1));
    }
    if lowered.contains("today") || lowered.contains("tonight") {
        return Some(now);
    }
    if let Some(caps) = NEXT_WEEKDAY.captures(lowered) {
        let target = weekday_from_name(caps.get(1)?.as_str())?;
        let offset = days_until_weekday(temporal::weekday_index(now), target);
        return Some(now + Duration::days(offset));
    }
    if let Some(caps) = WEEKDAY.captures(lowered) {
        let target = weekday_from_name(caps.get(1)?.as_str())?;
        let offset = days_until_weekday(temporal::weekday_index(now), target);
        return Some(now + Duration::days(offset));
    }
    if let Some(caps) = IN_AMOUNT.captures(lowered) {
        let amount: i64 = caps.get(1)?.as_str().parse().ok()?;
        let unit = match caps.get(2)?.as_str() {
            "minute" => TimeUnit::Minutes,
            "hour" => TimeUnit::Hours,
            "day" => TimeUnit::Days,
            "week" => TimeUnit::Weeks,
            "month" => TimeUnit::Months,
            _ => TimeUnit::Years,
        };
        return Some(temporal::add_interval(now, amount, unit));
    }
    if let Some(caps) = NUMERIC_DATE.captures(lowered) {
        let month: u32 = caps.get(1)?.as_str().parse().ok()?;
        let day: u32 = caps.get(2)?.as_str().parse().ok()?;
        let year: i32 = match caps.get(3) {
            Some(m) => {
                let raw: i32 = m.as_str().parse().ok()?;
                if raw < 100 {
                    2000 + raw
                } else {
                    raw
                }
            }
            None => now.date_naive().year(),
        };
        return calendar_date(year, month, day);
    }
    if let Some(caps) = MONTH_DAY.captures(lowered) {
        let month = month_from_name(caps.get(1)?.as_str())?;
        let day: u32 = caps.get(2)?.as_str().parse().ok()?;
        return calendar_date(now.date_naive().year(), month, day);
    }
    None
}

fn calendar_date(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use proptest::prelude::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    // 2025-03-12 is a Wednesday
    fn reference() -> DateTime<Utc> {
        at(2025, 3, 12, 10, 30)
    }

    #[test]
    fn test_tomorrow_with_time() {
        let resolved = extract_datetime("Schedule a meeting tomorrow at 2pm", reference()).unwrap();
        assert_eq!(resolved, at(2025, 3, 13, 14, 0));
    }

    #[test]
    fn test_time_only_anchors_to_reference_day() {
        let resolved = extract_datetime("call John at 9am", reference()).unwrap();
        assert_eq!(resolved, at(2025, 3, 12, 9, 0));
    }

    #[test]
    fn test_24_hour_clock() {
        let resolved = extract_datetime("meeting at 14:00 tomorrow", reference()).unwrap();
        assert_eq!(resolved, at(2025, 3, 13, 14, 0));
    }

    #[test]
    fn test_twelve_hour_edge_cases() {
        assert_eq!(extract_time_of_day("at 12am"), Some((0, 0)));
        assert_eq!(extract_time_of_day("at 12pm"), Some((12, 0)));
        assert_eq!(extract_time_of_day("at 12:30 p.m."), Some((12, 30)));
        assert_eq!(extract_time_of_day("at noon"), Some((12, 0)));
    }

    #[test]
    fn test_next_weekday_rolls_a_full_week() {
        // Reference is a Wednesday; "next wednesday" must be 7 days out
        let resolved = extract_datetime("next wednesday", reference()).unwrap();
        assert_eq!(resolved, reference() + Duration::days(7));

        let friday = extract_datetime("next friday", reference()).unwrap();
        assert_eq!(friday, reference() + Duration::days(2));
    }

    #[test]
    fn test_bare_weekday_is_upcoming() {
        let resolved = extract_datetime("on friday at 3pm", reference()).unwrap();
        assert_eq!(resolved, at(2025, 3, 14, 15, 0));
    }

    #[test]
    fn test_relative_offsets() {
        assert_eq!(
            extract_datetime("in 3 days", reference()),
            Some(reference() + Duration::days(3))
        );
        assert_eq!(
            extract_datetime("in 2 hours", reference()),
            Some(reference() + Duration::hours(2))
        );
    }

    #[test]
    fn test_numeric_date() {
        let resolved = extract_datetime("on 5/12 at 10am", reference()).unwrap();
        assert_eq!(resolved, at(2025, 5, 12, 10, 0));

        let with_year = extract_datetime("on 5/12/2026", reference()).unwrap();
        assert_eq!(with_year, at(2026, 5, 12, 0, 0));
    }

    #[test]
    fn test_month_name_date() {
        let resolved = extract_datetime("on June 5th at 2pm", reference()).unwrap();
        assert_eq!(resolved, at(2025, 6, 5, 14, 0));
    }

    #[test]
    fn test_no_cue_yields_none() {
        assert_eq!(extract_datetime("add milk to the shopping list", reference()), None);
    }

    proptest! {
        // Resolving "at H(:MM)(am|pm)" and formatting the result back to
        // 12-hour form reproduces the input hour and period
        #[test]
        fn twelve_hour_round_trip(hour in 1u32..=12, minute in 0u32..60, pm in any::<bool>()) {
            let meridiem = if pm { "pm" } else { "am" };
            let input = format!("meet at {}:{:02}{}", hour, minute, meridiem);
            let resolved = extract_datetime(&input, reference()).unwrap();

            let resolved_hour_12 = match resolved.hour() % 12 {
                0 => 12,
                h => h,
            };
            let resolved_meridiem = if resolved.hour() < 12 { "am" } else { "pm" };
            prop_assert_eq!(resolved_hour_12, hour);
            prop_assert_eq!(resolved_meridiem, meridiem);
            prop_assert_eq!(resolved.minute(), minute);
        }
    }
}
