//! Intent classification
//!
//! Maps lowercased input text to one of the closed command intents via an
//! ordered pattern list. First match wins; no match yields `Unknown`.
//!
//! Ordering is load-bearing: more specific patterns ("add X to the
//! meeting") sit above the generic ones ("create a meeting") that would
//! otherwise swallow them. The precedence tests below pin every known
//! overlap.

use crate::types::CommandIntent;
use once_cell::sync::Lazy;
use regex::Regex;

static INTENT_PATTERNS: Lazy<Vec<(Regex, CommandIntent)>> = Lazy::new(|| {
    [
        // Attendee changes before generic creation: "invite Sarah to the
        // budget meeting" must not classify as CreateEvent
        (
            r"\b(?:invite|add)\b.+?\bto\b.+?\b(?:meeting|event|call|appointment|lunch|dinner)\b",
            CommandIntent::AddAttendee,
        ),
        (
            r"\b(?:conflicts?|overlap(?:s|ping)?|double[- ]?book(?:ed|ing)?)\b",
            CommandIntent::CheckConflicts,
        ),
        (
            r"\b(?:free time|free slots?|open slots?|availability|(?:when |where )?am i free)\b",
            CommandIntent::FindFreeTime,
        ),
        (
            r"\bfind (?:a |some )?time\b|\bwhen (?:can|could|should) (?:we|i)\b|\bbest time\b",
            CommandIntent::FindTime,
        ),
        // Deleting a reminder is a delete, so this precedes SetReminder
        (
            r"\b(?:cancel|delete|remove)\b.+?\b(?:meeting|event|appointment|call|reminder)\b",
            CommandIntent::DeleteEvent,
        ),
        (
            r"\b(?:reschedule|postpone)\b|\b(?:move|change|update)\b.+?\b(?:meeting|event|appointment|call)\b",
            CommandIntent::UpdateEvent,
        ),
        (
            r"\bremind me\b|\bset (?:a |an )?reminder\b|\breminder (?:for|to|at)\b",
            CommandIntent::SetReminder,
        ),
        (
            r"\b(?:add|create|save|new)\b.+?\bcontacts?\b",
            CommandIntent::AddContact,
        ),
        (
            r"(?:'s|s') (?:email|phone|number|address)\b|\bcontact (?:info|information|details)\b",
            CommandIntent::QueryContact,
        ),
        // "what's on my calendar" pins to ListEvents ahead of QuerySchedule
        (
            r"what(?:'s| is) .*\bon my (?:calendar|schedule)\b|\b(?:show|list|view)\b.+?\b(?:events|meetings|appointments|calendar|agenda|schedule)\b|\bmy agenda\b",
            CommandIntent::ListEvents,
        ),
        (
            r"\b(?:do i have|am i busy|how busy)\b|\bwhat(?:'s| is) my schedule\b|\bwhat does my (?:day|week|month) look like\b",
            CommandIntent::QuerySchedule,
        ),
        // Generic creation last; recurrence-bearing phrases ("standup every
        // Monday") land here too since the vocabulary has no recurring intent
        (
            r"\b(?:schedule|create|add|set ?up|book|plan|organize|new)\b.+?\b(?:meeting|event|appointment|call|standup|sync|lunch|dinner|session|catch[- ]?up)\b",
            CommandIntent::CreateEvent,
        ),
    ]
    .into_iter()
    .map(|(pattern, intent)| (Regex::new(pattern).expect("valid intent pattern"), intent))
    .collect()
});

/// Classify an utterance into a command intent
pub fn classify(text: &str) -> CommandIntent {
    let lowered = text.to_lowercase();
    for (pattern, intent) in INTENT_PATTERNS.iter() {
        if pattern.is_match(&lowered) {
            return *intent;
        }
    }
    CommandIntent::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_event() {
        assert_eq!(
            classify("Schedule a meeting with John tomorrow at 2pm"),
            CommandIntent::CreateEvent
        );
        assert_eq!(
            classify("book a lunch with the design team"),
            CommandIntent::CreateEvent
        );
    }

    #[test]
    fn test_add_attendee_precedes_create_event() {
        assert_eq!(
            classify("Invite Sarah to the budget meeting"),
            CommandIntent::AddAttendee
        );
        assert_eq!(
            classify("Add John to the 3pm call"),
            CommandIntent::AddAttendee
        );
        // No "to <event>" clause, so this is plain creation
        assert_eq!(
            classify("Add a meeting to my calendar"),
            CommandIntent::CreateEvent
        );
    }

    #[test]
    fn test_recurring_creation_pins_to_create_event() {
        assert_eq!(
            classify("Create a team standup every Monday at 9am"),
            CommandIntent::CreateEvent
        );
        assert_eq!(
            classify("Schedule a yoga session every other week"),
            CommandIntent::CreateEvent
        );
    }

    #[test]
    fn test_calendar_query_pins_to_list_events() {
        assert_eq!(
            classify("What's on my calendar for next Tuesday?"),
            CommandIntent::ListEvents
        );
        assert_eq!(classify("Show my meetings this week"), CommandIntent::ListEvents);
    }

    #[test]
    fn test_query_schedule() {
        assert_eq!(
            classify("Do I have meetings tomorrow?"),
            CommandIntent::QuerySchedule
        );
        assert_eq!(classify("Am I busy on Friday?"), CommandIntent::QuerySchedule);
    }

    #[test]
    fn test_conflicts_precede_query_schedule() {
        assert_eq!(
            classify("Do I have any conflicts tomorrow?"),
            CommandIntent::CheckConflicts
        );
    }

    #[test]
    fn test_delete_and_update() {
        assert_eq!(classify("Cancel my 3pm meeting"), CommandIntent::DeleteEvent);
        assert_eq!(
            classify("Reschedule my dentist appointment to Friday"),
            CommandIntent::UpdateEvent
        );
        assert_eq!(
            classify("Move the standup meeting to 10am"),
            CommandIntent::UpdateEvent
        );
    }

    #[test]
    fn test_delete_reminder_precedes_set_reminder() {
        assert_eq!(
            classify("Delete my reminder about the dentist"),
            CommandIntent::DeleteEvent
        );
        assert_eq!(
            classify("Remind me to call John at 5pm"),
            CommandIntent::SetReminder
        );
    }

    #[test]
    fn test_contacts() {
        assert_eq!(
            classify("Add a contact named John Smith"),
            CommandIntent::AddContact
        );
        assert_eq!(classify("What's Sarah's email?"), CommandIntent::QueryContact);
    }

    #[test]
    fn test_free_time_lookup() {
        assert_eq!(
            classify("When am I free this week?"),
            CommandIntent::FindFreeTime
        );
        assert_eq!(
            classify("Find a time for a 30 minute sync"),
            CommandIntent::FindTime
        );
    }

    #[test]
    fn test_no_match_yields_unknown() {
        assert_eq!(classify("the weather is nice today"), CommandIntent::Unknown);
        assert_eq!(classify(""), CommandIntent::Unknown);
    }
}
