//! Core data types for the Kairos command pipeline
//!
//! This module defines the fundamental data structures produced by the
//! interpretation pipeline: the closed intent vocabulary, the sparse entity
//! record, recurrence patterns, and the `ParsedCommand` envelope every
//! parsing strategy returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of commands the assistant understands
///
/// Free text never leaks into this enum: anything the classifiers cannot
/// place maps to `Unknown`, which the command router turns into a
/// clarifying question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandIntent {
    CreateEvent,
    UpdateEvent,
    DeleteEvent,
    ListEvents,
    QuerySchedule,
    AddContact,
    QueryContact,
    SetReminder,
    FindTime,
    FindFreeTime,
    AddAttendee,
    CheckConflicts,
    Unknown,
}

impl CommandIntent {
    /// Resolve an intent from its wire name, mapping unrecognized names
    /// to `Unknown` instead of failing
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_uppercase().as_str() {
            "CREATE_EVENT" => CommandIntent::CreateEvent,
            "UPDATE_EVENT" => CommandIntent::UpdateEvent,
            "DELETE_EVENT" => CommandIntent::DeleteEvent,
            "LIST_EVENTS" => CommandIntent::ListEvents,
            "QUERY_SCHEDULE" => CommandIntent::QuerySchedule,
            "ADD_CONTACT" => CommandIntent::AddContact,
            "QUERY_CONTACT" => CommandIntent::QueryContact,
            "SET_REMINDER" => CommandIntent::SetReminder,
            "FIND_TIME" => CommandIntent::FindTime,
            "FIND_FREE_TIME" => CommandIntent::FindFreeTime,
            "ADD_ATTENDEE" => CommandIntent::AddAttendee,
            "CHECK_CONFLICTS" => CommandIntent::CheckConflicts,
            _ => CommandIntent::Unknown,
        }
    }

    /// Wire name of this intent
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandIntent::CreateEvent => "CREATE_EVENT",
            CommandIntent::UpdateEvent => "UPDATE_EVENT",
            CommandIntent::DeleteEvent => "DELETE_EVENT",
            CommandIntent::ListEvents => "LIST_EVENTS",
            CommandIntent::QuerySchedule => "QUERY_SCHEDULE",
            CommandIntent::AddContact => "ADD_CONTACT",
            CommandIntent::QueryContact => "QUERY_CONTACT",
            CommandIntent::SetReminder => "SET_REMINDER",
            CommandIntent::FindTime => "FIND_TIME",
            CommandIntent::FindFreeTime => "FIND_FREE_TIME",
            CommandIntent::AddAttendee => "ADD_ATTENDEE",
            CommandIntent::CheckConflicts => "CHECK_CONFLICTS",
            CommandIntent::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for CommandIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recurrence frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Resolve a frequency from its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "daily" => Some(Frequency::Daily),
            "weekly" => Some(Frequency::Weekly),
            "monthly" => Some(Frequency::Monthly),
            "yearly" | "annually" => Some(Frequency::Yearly),
            _ => None,
        }
    }
}

/// Delivery channel for reminders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderType {
    Email,
    Sms,
    Push,
}

impl ReminderType {
    /// Resolve a reminder channel from its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "email" => Some(ReminderType::Email),
            "sms" | "text" => Some(ReminderType::Sms),
            "push" | "notification" => Some(ReminderType::Push),
            _ => None,
        }
    }
}

impl Default for ReminderType {
    fn default() -> Self {
        ReminderType::Push
    }
}

/// A pair of instants with `start < end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range, rejecting inverted or empty intervals
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Whether an instant falls inside the closed interval
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Structured description of a repeating schedule
///
/// `end_date` and `occurrences` are mutually exclusive terminal conditions;
/// the extractors fill whichever clause actually matched, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringPattern {
    pub frequency: Frequency,

    /// Repeat every N frequency units, at least 1
    pub interval: u32,

    /// 0 = Sunday .. 6 = Saturday, deduplicated and ascending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<u8>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurrences: Option<u32>,
}

impl Default for RecurringPattern {
    fn default() -> Self {
        Self {
            frequency: Frequency::Daily,
            interval: 1,
            days_of_week: None,
            day_of_month: None,
            end_date: None,
            occurrences: None,
        }
    }
}

/// Sparse record of everything the extractors pulled out of one utterance
///
/// Only fields relevant to the detected intent are populated; every other
/// field is absent, mirroring which extractors produced a value. Absent is
/// distinct from null-filled and must stay that way across serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedEntities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<Utc>>,

    /// Event length in minutes
    #[serde(rename = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// First-seen order, duplicates removed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_pattern: Option<RecurringPattern>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_type: Option<ReminderType>,

    /// Opaque reference to an existing calendar item, carried through only
    /// when the remote model supplies it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl ExtractedEntities {
    /// Whether no extractor produced a value
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date_time.is_none()
            && self.duration_minutes.is_none()
            && self.location.is_none()
            && self.description.is_none()
            && self.attendees.is_none()
            && self.contact_name.is_none()
            && self.time_range.is_none()
            && self.recurring_pattern.is_none()
            && self.reminder_time.is_none()
            && self.reminder_type.is_none()
            && self.event_id.is_none()
    }
}

/// The pipeline's sole output type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCommand {
    pub intent: CommandIntent,

    pub entities: ExtractedEntities,

    /// In [0, 1]; remote results carry the model's self-reported value,
    /// local fallback results a fixed 0.6 (matched) or 0.3 (unmatched)
    pub confidence: f32,

    /// Verbatim input, preserved for audit and as the cache key basis
    pub original_text: String,
}

impl ParsedCommand {
    /// Whether the router can act on this without asking a clarifying question
    pub fn is_actionable(&self) -> bool {
        self.intent != CommandIntent::Unknown && self.confidence >= 0.5
    }
}
