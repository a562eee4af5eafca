//! Entity extraction
//!
//! A family of independent extractors, one per entity kind, each a pure
//! function from input text to an optional typed value. Extractors never
//! error; absence of a match is absence of the field. The local fallback
//! parser composes them per intent.

pub mod attendees;
pub mod contact;
pub mod datetime;
pub mod duration;
pub mod location;
pub mod range;
pub mod recurrence;
pub mod reminder;
pub mod title;

pub use attendees::extract_attendees;
pub use contact::extract_contact_name;
pub use datetime::extract_datetime;
pub use duration::extract_duration;
pub use location::extract_location;
pub use range::extract_time_range;
pub use recurrence::extract_recurrence;
pub use reminder::{extract_reminder_time, extract_reminder_type};
pub use title::extract_title;

/// Weekday names in index order, Sunday = 0
pub(crate) const WEEKDAY_NAMES: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Index of a lowercased weekday name, Sunday = 0
pub(crate) fn weekday_from_name(name: &str) -> Option<u8> {
    WEEKDAY_NAMES
        .iter()
        .position(|candidate| *candidate == name)
        .map(|index| index as u8)
}

/// Month number (1-12) of a lowercased month name or abbreviation
pub(crate) fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.trim_end_matches('.') {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Forward offset in days from `current` to `target` weekday, always 1..=7
/// (a zero or negative offset rolls to the following week, so "next Monday"
/// said on a Monday is a week out, never today)
pub(crate) fn days_until_weekday(current: u8, target: u8) -> i64 {
    let mut offset = target as i64 - current as i64;
    if offset <= 0 {
        offset += 7;
    }
    offset
}
