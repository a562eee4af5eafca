//! Local fallback parser
//!
//! The fully-offline parsing path: classify the intent, then run the
//! extractors relevant to it. Date/time, duration, attendees, location
//! and recurrence run unconditionally since they are broadly useful;
//! title, contact-name, time-range and reminder are gated by intent.
//!
//! Confidence is fixed rather than computed from match quality: 0.6 when
//! an intent pattern matched, 0.3 otherwise.

use crate::extract;
use crate::intent;
use crate::types::{CommandIntent, ExtractedEntities, ParsedCommand};
use chrono::{DateTime, Utc};
use tracing::debug;

const MATCHED_CONFIDENCE: f32 = 0.6;
const UNMATCHED_CONFIDENCE: f32 = 0.3;

/// Parse an utterance entirely locally, relative to `now`
pub fn parse_locally(text: &str, now: DateTime<Utc>) -> ParsedCommand {
    let detected = intent::classify(text);
    debug!(intent = %detected, "local fallback parse");

    let mut entities = ExtractedEntities {
        date_time: extract::extract_datetime(text, now),
        attendees: extract::extract_attendees(text),
        location: extract::extract_location(text),
        recurring_pattern: extract::extract_recurrence(text, now),
        ..Default::default()
    };
    entities.duration_minutes = extract::extract_duration(text, entities.date_time.is_some());

    match detected {
        CommandIntent::CreateEvent | CommandIntent::UpdateEvent => {
            entities.title = extract::extract_title(text);
        }
        CommandIntent::AddContact | CommandIntent::QueryContact => {
            entities.contact_name = extract::extract_contact_name(text);
        }
        CommandIntent::ListEvents
        | CommandIntent::QuerySchedule
        | CommandIntent::CheckConflicts
        | CommandIntent::FindTime
        | CommandIntent::FindFreeTime => {
            entities.time_range = extract::extract_time_range(text, now);
        }
        CommandIntent::SetReminder => {
            entities.reminder_time = extract::extract_reminder_time(text, now);
            entities.reminder_type = Some(extract::extract_reminder_type(text));
        }
        _ => {}
    }

    let confidence = if detected == CommandIntent::Unknown {
        UNMATCHED_CONFIDENCE
    } else {
        MATCHED_CONFIDENCE
    };

    ParsedCommand {
        intent: detected,
        entities,
        confidence,
        original_text: text.to_string(),
    }
}
