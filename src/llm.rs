//! Remote parsing client
//!
//! Builds a structured prompt embedding the current instant and the input
//! text, calls a chat-completion endpoint, and validates the JSON reply
//! into a `ParsedCommand`. Implements bounded retry with linear backoff
//! and records a rate-limit cool-down that lets the facade bypass the
//! client entirely while a 429 window is in effect.

use crate::clock::Clock;
use crate::config::NlpConfig;
use crate::error::{KairosError, Result};
use crate::types::{
    CommandIntent, ExtractedEntities, Frequency, ParsedCommand, RecurringPattern, ReminderType,
    TimeRange,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use reqwest::{header, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tokio::time::sleep;
use tracing::{debug, warn};

const SYSTEM_INSTRUCTION: &str = "You are a calendar assistant that converts natural language \
     into structured commands. Respond with a single JSON object and nothing else.";

/// Shared rate-limit cool-down deadline
///
/// A single scalar with no cross-field invariant; last writer wins. While
/// the deadline lies in the future the facade skips the remote client
/// without spending an attempt.
#[derive(Debug, Default)]
pub struct RateLimitState {
    deadline: RwLock<Option<DateTime<Utc>>>,
}

impl RateLimitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cool-down deadline
    pub fn activate_until(&self, deadline: DateTime<Utc>) {
        if let Ok(mut guard) = self.deadline.write() {
            *guard = Some(deadline);
        }
    }

    /// Whether a cool-down is in effect at `now`
    pub fn active_at(&self, now: DateTime<Utc>) -> bool {
        self.deadline
            .read()
            .ok()
            .and_then(|guard| *guard)
            .is_some_and(|deadline| deadline > now)
    }
}

/// Client for the remote completion endpoint
pub struct LlmParser {
    config: NlpConfig,
    api_key: String,
    client: reqwest::Client,
    limiter: Arc<RateLimitState>,
    clock: Arc<dyn Clock>,
}

/// Chat-completion request format
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat-completion response format
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Schema the model is instructed to produce
#[derive(Debug, Deserialize)]
struct WireCommand {
    intent: String,
    confidence: Option<f32>,
    #[serde(default)]
    entities: WireEntities,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEntities {
    title: Option<String>,
    date_time: Option<String>,
    duration: Option<u32>,
    location: Option<String>,
    description: Option<String>,
    attendees: Option<Vec<String>>,
    contact_name: Option<String>,
    time_range: Option<WireTimeRange>,
    recurring_pattern: Option<WireRecurrence>,
    reminder_time: Option<String>,
    reminder_type: Option<String>,
    event_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireTimeRange {
    start: String,
    end: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRecurrence {
    frequency: Option<String>,
    interval: Option<u32>,
    days_of_week: Option<Vec<u8>>,
    day_of_month: Option<u8>,
    end_date: Option<String>,
    occurrences: Option<u32>,
}

impl LlmParser {
    /// Create a client; fails when no API key is configured
    pub fn new(
        config: NlpConfig,
        limiter: Arc<RateLimitState>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| KairosError::Config("LLM API key not configured".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            config,
            api_key,
            client,
            limiter,
            clock,
        })
    }

    /// Parse an utterance via the remote model
    ///
    /// Retries transient failures up to the configured attempt budget with
    /// linearly increasing backoff. A 429 records the cool-down deadline
    /// and is retried within the same budget; other 4xx responses
    /// propagate immediately. The facade converts any error from here into
    /// a local fallback parse.
    pub async fn parse(&self, text: &str, now: DateTime<Utc>) -> Result<ParsedCommand> {
        let prompt = build_prompt(text, now);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.attempt(&prompt, text).await {
                Ok(command) => return Ok(command),
                Err(err) => {
                    if let KairosError::RateLimited(secs) = err {
                        let deadline = self.clock.now() + Duration::seconds(secs as i64);
                        self.limiter.activate_until(deadline);
                        warn!(retry_after_secs = secs, "LLM rate limited, cool-down recorded");
                    }
                    let retryable = matches!(
                        err,
                        KairosError::RateLimited(_) | KairosError::Http(_) | KairosError::LlmApi(_)
                    );
                    if !retryable || attempt >= self.config.max_retries {
                        return Err(err);
                    }
                    let delay_ms = self.config.backoff_base_ms * attempt as u64;
                    debug!(attempt, delay_ms, "retrying LLM parse after error: {err}");
                    sleep(std::time::Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    async fn attempt(&self, prompt: &str, original: &str) -> Result<ParsedCommand> {
        debug!(model = %self.config.model, "calling completion endpoint");

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let secs = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .unwrap_or(self.config.cooldown_secs);
            return Err(KairosError::RateLimited(secs));
        }
        if status.is_client_error() {
            let message = response.text().await.unwrap_or_default();
            return Err(KairosError::LlmRejected {
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(KairosError::LlmApi(format!(
                "completion endpoint returned {status}: {message}"
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| KairosError::LlmApi(format!("malformed completion response: {err}")))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| KairosError::LlmApi("completion response contained no choices".to_string()))?;

        decode_response(&content, original)
    }
}

fn build_prompt(text: &str, now: DateTime<Utc>) -> String {
    format!(
        r#"Current date and time: {now}

Convert the calendar request below into a JSON object:
{{
  "intent": one of CREATE_EVENT, UPDATE_EVENT, DELETE_EVENT, LIST_EVENTS, QUERY_SCHEDULE, ADD_CONTACT, QUERY_CONTACT, SET_REMINDER, FIND_TIME, FIND_FREE_TIME, ADD_ATTENDEE, CHECK_CONFLICTS, UNKNOWN,
  "confidence": number between 0 and 1,
  "entities": {{
    "title": string,
    "dateTime": ISO 8601 date-time,
    "duration": length in minutes as an integer,
    "location": string,
    "description": string,
    "attendees": array of name strings,
    "contactName": string,
    "eventId": string,
    "timeRange": {{"start": ISO 8601, "end": ISO 8601}},
    "recurringPattern": {{"frequency": "daily"|"weekly"|"monthly"|"yearly", "interval": integer, "daysOfWeek": array of integers 0-6 with 0 = Sunday, "dayOfMonth": integer, "endDate": ISO 8601, "occurrences": integer}},
    "reminderTime": ISO 8601,
    "reminderType": "email"|"sms"|"push"
  }}
}}

Omit every entity field the request does not mention. Respond with the JSON object only.

Request: "{text}""#,
        now = now.to_rfc3339(),
        text = text
    )
}

/// Validate the model's JSON reply into a `ParsedCommand`
///
/// Unrecognized intent names map to `Unknown`, unrecognized recurrence
/// frequencies to daily, unrecognized reminder types to push; date-valued
/// fields are rehydrated from their serialized form, dropping any that do
/// not parse.
pub(crate) fn decode_response(content: &str, original: &str) -> Result<ParsedCommand> {
    let payload = strip_code_fence(content);
    let wire: WireCommand = serde_json::from_str(payload)
        .map_err(|err| KairosError::LlmApi(format!("model returned invalid JSON: {err}")))?;

    let intent = CommandIntent::from_name(&wire.intent);
    let confidence = wire.confidence.unwrap_or(0.5).clamp(0.0, 1.0);

    Ok(ParsedCommand {
        intent,
        entities: rehydrate_entities(wire.entities),
        confidence,
        original_text: original.to_string(),
    })
}

fn rehydrate_entities(wire: WireEntities) -> ExtractedEntities {
    let time_range = wire.time_range.and_then(|range| {
        let start = parse_instant(&range.start)?;
        let end = parse_instant(&range.end)?;
        TimeRange::new(start, end)
    });

    let recurring_pattern = wire.recurring_pattern.map(|recurrence| {
        let frequency = recurrence
            .frequency
            .as_deref()
            .and_then(Frequency::from_name)
            .unwrap_or(Frequency::Daily);
        let days_of_week = recurrence.days_of_week.and_then(|mut days| {
            days.retain(|day| *day <= 6);
            days.sort_unstable();
            days.dedup();
            if days.is_empty() {
                None
            } else {
                Some(days)
            }
        });
        let end_date = recurrence.end_date.as_deref().and_then(parse_instant);
        // endDate and occurrences are mutually exclusive; endDate wins
        let occurrences = if end_date.is_some() {
            None
        } else {
            recurrence.occurrences
        };
        RecurringPattern {
            frequency,
            interval: recurrence.interval.unwrap_or(1).max(1),
            days_of_week,
            day_of_month: recurrence.day_of_month.filter(|day| (1..=31).contains(day)),
            end_date,
            occurrences,
        }
    });

    let attendees = wire.attendees.and_then(|raw| {
        let mut names: Vec<String> = Vec::new();
        for name in raw {
            let name = name.trim().to_string();
            if name.is_empty() {
                continue;
            }
            if !names.iter().any(|seen| seen.eq_ignore_ascii_case(&name)) {
                names.push(name);
            }
        }
        if names.is_empty() {
            None
        } else {
            Some(names)
        }
    });

    ExtractedEntities {
        title: non_empty(wire.title),
        date_time: wire.date_time.as_deref().and_then(parse_instant),
        duration_minutes: wire.duration,
        location: non_empty(wire.location),
        description: non_empty(wire.description),
        attendees,
        contact_name: non_empty(wire.contact_name),
        time_range,
        recurring_pattern,
        reminder_time: wire.reminder_time.as_deref().and_then(parse_instant),
        reminder_type: wire
            .reminder_type
            .as_deref()
            .map(|name| ReminderType::from_name(name).unwrap_or_default()),
        event_id: non_empty(wire.event_id),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    // Models occasionally emit bare dates for endDate and the like
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    warn!(value = raw, "dropping unparseable date field from model reply");
    None
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches(['\r', '\n'])
        .trim_end_matches('`')
        .trim()
}
