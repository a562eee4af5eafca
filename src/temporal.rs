//! Temporal resolution primitives
//!
//! Pure calendar arithmetic over `DateTime<Utc>`: shifting instants by a
//! unit amount, snapping to period boundaries, diffing instants, and
//! walking recurrence patterns forward. Everything else in the pipeline
//! calls into this module; it depends on nothing but chrono.
//!
//! Month arithmetic uses chrono's native clamping (Jan 31 plus one month
//! lands on the last day of February). Weeks start on Sunday.

use crate::types::{Frequency, RecurringPattern};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};

/// Unit for interval arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

/// Unit for period boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarUnit {
    Day,
    Week,
    Month,
    Year,
}

/// Shift an instant by a signed amount of the given unit
pub fn add_interval(instant: DateTime<Utc>, amount: i64, unit: TimeUnit) -> DateTime<Utc> {
    match unit {
        TimeUnit::Minutes => instant + Duration::minutes(amount),
        TimeUnit::Hours => instant + Duration::hours(amount),
        TimeUnit::Days => instant + Duration::days(amount),
        TimeUnit::Weeks => instant + Duration::weeks(amount),
        TimeUnit::Months => shift_months(instant, amount),
        TimeUnit::Years => shift_months(instant, amount.saturating_mul(12)),
    }
}

fn shift_months(instant: DateTime<Utc>, months: i64) -> DateTime<Utc> {
    let delta = Months::new(months.unsigned_abs() as u32);
    let shifted = if months >= 0 {
        instant.checked_add_months(delta)
    } else {
        instant.checked_sub_months(delta)
    };
    shifted.unwrap_or(instant)
}

/// Zero-index of the weekday, Sunday = 0 .. Saturday = 6
pub fn weekday_index(instant: DateTime<Utc>) -> u8 {
    instant.weekday().num_days_from_sunday() as u8
}

/// Snap an instant down to the start of its day/week/month/year
pub fn start_of(instant: DateTime<Utc>, unit: CalendarUnit) -> DateTime<Utc> {
    match unit {
        CalendarUnit::Day => day_floor(instant.date_naive()),
        CalendarUnit::Week => {
            let back = weekday_index(instant) as i64;
            day_floor((instant - Duration::days(back)).date_naive())
        }
        CalendarUnit::Month => {
            let date = instant.date_naive();
            day_floor(first_of_month(date.year(), date.month()))
        }
        CalendarUnit::Year => day_floor(first_of_month(instant.date_naive().year(), 1)),
    }
}

/// Snap an instant up to the last millisecond of its day/week/month/year
pub fn end_of(instant: DateTime<Utc>, unit: CalendarUnit) -> DateTime<Utc> {
    match unit {
        CalendarUnit::Day => day_ceil(instant.date_naive()),
        CalendarUnit::Week => {
            let forward = 6 - weekday_index(instant) as i64;
            day_ceil((instant + Duration::days(forward)).date_naive())
        }
        CalendarUnit::Month => {
            let date = instant.date_naive();
            day_ceil(last_of_month(date.year(), date.month()))
        }
        CalendarUnit::Year => day_ceil(last_of_month(instant.date_naive().year(), 12)),
    }
}

fn day_floor(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn day_ceil(date: NaiveDate) -> DateTime<Utc> {
    let end = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("valid time");
    Utc.from_utc_datetime(&date.and_time(end))
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("valid first of month")
}

fn last_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    first_of_month(next_year, next_month) - Duration::days(1)
}

/// Signed whole-unit difference `a - b`, truncating toward zero
pub fn diff(a: DateTime<Utc>, b: DateTime<Utc>, unit: TimeUnit) -> i64 {
    match unit {
        TimeUnit::Minutes => (a - b).num_minutes(),
        TimeUnit::Hours => (a - b).num_hours(),
        TimeUnit::Days => (a - b).num_days(),
        TimeUnit::Weeks => (a - b).num_weeks(),
        TimeUnit::Months => diff_months(a, b),
        TimeUnit::Years => diff_months(a, b) / 12,
    }
}

fn diff_months(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    let mut months = (a.date_naive().year() as i64 - b.date_naive().year() as i64) * 12
        + (a.date_naive().month() as i64 - b.date_naive().month() as i64);
    // Truncate partial months
    if months > 0 && shift_months(b, months) > a {
        months -= 1;
    }
    if months < 0 && shift_months(b, months) < a {
        months += 1;
    }
    months
}

/// First instant of a pattern strictly after `after`
///
/// Walks the occurrence sequence forward from `anchor`. Returns `None`
/// (absence, not an error) once the pattern's `end_date` or `occurrences`
/// cap is exceeded.
pub fn next_occurrence(
    pattern: &RecurringPattern,
    anchor: DateTime<Utc>,
    after: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let mut current = first_occurrence(pattern, anchor);
    let mut emitted: u32 = 0;
    loop {
        emitted += 1;
        if let Some(cap) = pattern.occurrences {
            if emitted > cap {
                return None;
            }
        }
        if let Some(end) = pattern.end_date {
            if current > end {
                return None;
            }
        }
        if current > after {
            return Some(current);
        }
        current = advance(pattern, current, anchor);
    }
}

/// All occurrences of a pattern intersecting the closed interval
/// `[range_start, range_end]`, in ascending order
pub fn occurrences_in_range(
    pattern: &RecurringPattern,
    anchor: DateTime<Utc>,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> Vec<DateTime<Utc>> {
    let mut occurrences = Vec::new();
    let mut threshold = range_start - Duration::nanoseconds(1);
    while let Some(occurrence) = next_occurrence(pattern, anchor, threshold) {
        if occurrence > range_end {
            break;
        }
        occurrences.push(occurrence);
        threshold = occurrence;
    }
    occurrences
}

fn first_occurrence(pattern: &RecurringPattern, anchor: DateTime<Utc>) -> DateTime<Utc> {
    match (pattern.frequency, &pattern.days_of_week) {
        (Frequency::Weekly, Some(days)) if !days.is_empty() => {
            let mut candidate = anchor;
            for _ in 0..7 {
                if days.contains(&weekday_index(candidate)) {
                    return candidate;
                }
                candidate = candidate + Duration::days(1);
            }
            candidate
        }
        (Frequency::Monthly, _) => match pattern.day_of_month {
            Some(day) => {
                let candidate = with_day_clamped(anchor, day);
                if candidate >= anchor {
                    candidate
                } else {
                    with_day_clamped(shift_months(anchor, 1), day)
                }
            }
            None => anchor,
        },
        _ => anchor,
    }
}

fn advance(
    pattern: &RecurringPattern,
    current: DateTime<Utc>,
    anchor: DateTime<Utc>,
) -> DateTime<Utc> {
    let interval = pattern.interval.max(1) as i64;
    match pattern.frequency {
        Frequency::Daily => current + Duration::days(interval),
        Frequency::Weekly => match &pattern.days_of_week {
            Some(days) if !days.is_empty() => {
                let anchor_week = start_of(anchor, CalendarUnit::Week);
                let mut candidate = current + Duration::days(1);
                loop {
                    if days.contains(&weekday_index(candidate)) {
                        let weeks =
                            (start_of(candidate, CalendarUnit::Week) - anchor_week).num_days() / 7;
                        if weeks % interval == 0 {
                            return candidate;
                        }
                    }
                    candidate = candidate + Duration::days(1);
                }
            }
            _ => current + Duration::weeks(interval),
        },
        Frequency::Monthly => {
            let shifted = shift_months(current, interval);
            match pattern.day_of_month {
                Some(day) => with_day_clamped(shifted, day),
                None => shifted,
            }
        }
        Frequency::Yearly => shift_months(current, interval.saturating_mul(12)),
    }
}

fn with_day_clamped(instant: DateTime<Utc>, day: u8) -> DateTime<Utc> {
    let date = instant.date_naive();
    let last = last_of_month(date.year(), date.month()).day();
    instant
        .with_day((day as u32).clamp(1, last))
        .unwrap_or(instant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_add_interval_simple_units() {
        let base = at(2025, 3, 10, 9, 0);
        assert_eq!(
            add_interval(base, 90, TimeUnit::Minutes),
            at(2025, 3, 10, 10, 30)
        );
        assert_eq!(add_interval(base, -2, TimeUnit::Days), at(2025, 3, 8, 9, 0));
        assert_eq!(
            add_interval(base, 2, TimeUnit::Weeks),
            at(2025, 3, 24, 9, 0)
        );
    }

    #[test]
    fn test_add_interval_month_end_clamps() {
        let jan31 = at(2025, 1, 31, 12, 0);
        assert_eq!(
            add_interval(jan31, 1, TimeUnit::Months),
            at(2025, 2, 28, 12, 0)
        );
        assert_eq!(
            add_interval(jan31, 1, TimeUnit::Years),
            at(2026, 1, 31, 12, 0)
        );
    }

    #[test]
    fn test_start_of_week_is_sunday() {
        // 2025-03-12 is a Wednesday
        let wednesday = at(2025, 3, 12, 15, 30);
        let start = start_of(wednesday, CalendarUnit::Week);
        assert_eq!(weekday_index(start), 0);
        assert_eq!(start, at(2025, 3, 9, 0, 0));

        // A Sunday snaps to itself
        let sunday = at(2025, 3, 9, 8, 0);
        assert_eq!(start_of(sunday, CalendarUnit::Week), at(2025, 3, 9, 0, 0));
    }

    #[test]
    fn test_day_boundaries() {
        let noonish = at(2025, 6, 5, 13, 45);
        assert_eq!(start_of(noonish, CalendarUnit::Day), at(2025, 6, 5, 0, 0));

        let end = end_of(noonish, CalendarUnit::Day);
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
        assert_eq!(end.timestamp_subsec_millis(), 999);
    }

    #[test]
    fn test_month_and_year_boundaries() {
        let leap_feb = at(2024, 2, 14, 10, 0);
        assert_eq!(end_of(leap_feb, CalendarUnit::Month), day_ceil_for_test(2024, 2, 29));
        assert_eq!(start_of(leap_feb, CalendarUnit::Year), at(2024, 1, 1, 0, 0));
        assert_eq!(end_of(leap_feb, CalendarUnit::Year), day_ceil_for_test(2024, 12, 31));
    }

    fn day_ceil_for_test(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        end_of(at(y, mo, d, 12, 0), CalendarUnit::Day)
    }

    #[test]
    fn test_diff_truncates() {
        let a = at(2025, 3, 10, 9, 0);
        assert_eq!(diff(at(2025, 3, 12, 8, 59), a, TimeUnit::Days), 1);
        assert_eq!(diff(at(2025, 5, 9, 9, 0), a, TimeUnit::Months), 1);
        assert_eq!(diff(at(2025, 5, 10, 9, 0), a, TimeUnit::Months), 2);
        assert_eq!(diff(a, at(2025, 5, 10, 9, 0), TimeUnit::Months), -2);
    }

    #[test]
    fn test_weekly_monday_pattern_never_returns_same_day() {
        // 2025-03-10 is a Monday
        let monday = at(2025, 3, 10, 9, 0);
        let pattern = RecurringPattern {
            frequency: Frequency::Weekly,
            days_of_week: Some(vec![1]),
            ..Default::default()
        };
        let next = next_occurrence(&pattern, monday, monday).unwrap();
        assert_eq!(next, monday + Duration::days(7));
    }

    #[test]
    fn test_weekly_multi_day_pattern() {
        // Monday anchor, Monday+Thursday schedule
        let monday = at(2025, 3, 10, 9, 0);
        let pattern = RecurringPattern {
            frequency: Frequency::Weekly,
            days_of_week: Some(vec![1, 4]),
            ..Default::default()
        };
        let next = next_occurrence(&pattern, monday, monday).unwrap();
        assert_eq!(next, at(2025, 3, 13, 9, 0));
    }

    #[test]
    fn test_biweekly_interval_skips_a_week() {
        let monday = at(2025, 3, 10, 9, 0);
        let pattern = RecurringPattern {
            frequency: Frequency::Weekly,
            interval: 2,
            days_of_week: Some(vec![1]),
            ..Default::default()
        };
        let next = next_occurrence(&pattern, monday, monday).unwrap();
        assert_eq!(next, monday + Duration::days(14));
    }

    #[test]
    fn test_occurrence_cap_exhausts() {
        let monday = at(2025, 3, 10, 9, 0);
        let pattern = RecurringPattern {
            frequency: Frequency::Daily,
            occurrences: Some(3),
            ..Default::default()
        };
        // Occurrences are the 10th, 11th and 12th; nothing after the 12th
        let last = next_occurrence(&pattern, monday, at(2025, 3, 11, 9, 0)).unwrap();
        assert_eq!(last, at(2025, 3, 12, 9, 0));
        assert!(next_occurrence(&pattern, monday, last).is_none());
    }

    #[test]
    fn test_end_date_cap() {
        let monday = at(2025, 3, 10, 9, 0);
        let pattern = RecurringPattern {
            frequency: Frequency::Weekly,
            end_date: Some(at(2025, 3, 20, 0, 0)),
            ..Default::default()
        };
        assert_eq!(
            next_occurrence(&pattern, monday, monday),
            Some(at(2025, 3, 17, 9, 0))
        );
        assert!(next_occurrence(&pattern, monday, at(2025, 3, 17, 9, 0)).is_none());
    }

    #[test]
    fn test_monthly_day_of_month_clamps() {
        let anchor = at(2025, 1, 15, 10, 0);
        let pattern = RecurringPattern {
            frequency: Frequency::Monthly,
            day_of_month: Some(31),
            ..Default::default()
        };
        let first = next_occurrence(&pattern, anchor, anchor).unwrap();
        assert_eq!(first, at(2025, 1, 31, 10, 0));
        let second = next_occurrence(&pattern, anchor, first).unwrap();
        assert_eq!(second, at(2025, 2, 28, 10, 0));
    }

    #[test]
    fn test_occurrences_in_range_stays_inside_interval() {
        let anchor = at(2025, 3, 1, 9, 0);
        let pattern = RecurringPattern {
            frequency: Frequency::Daily,
            ..Default::default()
        };
        let range_start = at(2025, 3, 5, 0, 0);
        let range_end = at(2025, 3, 8, 23, 0);
        let occurrences = occurrences_in_range(&pattern, anchor, range_start, range_end);
        assert_eq!(occurrences.len(), 4);
        for occurrence in &occurrences {
            assert!(*occurrence >= range_start && *occurrence <= range_end);
        }
    }

    #[test]
    fn test_occurrences_in_range_respects_cap() {
        let anchor = at(2025, 3, 1, 9, 0);
        let pattern = RecurringPattern {
            frequency: Frequency::Daily,
            occurrences: Some(2),
            ..Default::default()
        };
        let occurrences =
            occurrences_in_range(&pattern, anchor, at(2025, 2, 1, 0, 0), at(2025, 4, 1, 0, 0));
        assert_eq!(occurrences.len(), 2);
        assert_eq!(occurrences, vec![anchor, at(2025, 3, 2, 9, 0)]);
    }
}
