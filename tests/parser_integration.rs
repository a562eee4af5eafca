//! Facade integration tests against a mock completion endpoint
//!
//! These exercise the remote-vs-fallback decision logic end to end: retry
//! exhaustion, client errors, rate-limit cool-down, and cache-level
//! de-duplication of remote calls.

use kairos_core::{CommandIntent, CommandParser, NlpConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn remote_config(server: &MockServer) -> NlpConfig {
    let mut config = NlpConfig::default();
    config.api_key = Some("test-key".to_string());
    config.base_url = server.uri();
    // Keep retries fast in tests
    config.backoff_base_ms = 5;
    config
}

fn completion_body(content: serde_json::Value) -> serde_json::Value {
    json!({
        "choices": [
            {"message": {"role": "assistant", "content": content.to_string()}}
        ]
    })
}

#[tokio::test]
async fn remote_success_maps_model_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!({
            "intent": "CREATE_EVENT",
            "confidence": 0.93,
            "entities": {
                "title": "Budget review",
                "dateTime": "2025-03-13T14:00:00Z",
                "duration": 45,
                "attendees": ["John"]
            }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let parser = CommandParser::new(remote_config(&server)).unwrap();
    let command = parser
        .parse_command("schedule a budget review with John")
        .await
        .unwrap();

    assert_eq!(command.intent, CommandIntent::CreateEvent);
    assert_eq!(command.confidence, 0.93);
    assert_eq!(command.entities.title, Some("Budget review".to_string()));
    assert_eq!(command.entities.duration_minutes, Some(45));
    assert_eq!(command.entities.attendees, Some(vec!["John".to_string()]));
    server.verify().await;
}

#[tokio::test]
async fn total_remote_failure_still_returns_a_command() {
    let server = MockServer::start().await;
    // Every attempt fails; the attempt budget is 3
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let parser = CommandParser::new(remote_config(&server)).unwrap();
    let command = parser
        .parse_command("Schedule a meeting with John tomorrow at 2pm")
        .await
        .expect("facade must never surface remote failures");

    // Intent comes from the local fallback parser
    assert_eq!(command.intent, CommandIntent::CreateEvent);
    assert_eq!(command.confidence, 0.6);
    assert_eq!(command.entities.attendees, Some(vec!["John".to_string()]));
    server.verify().await;
}

#[tokio::test]
async fn malformed_model_reply_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(json!("this is not a command object"))),
        )
        .expect(3)
        .mount(&server)
        .await;

    let parser = CommandParser::new(remote_config(&server)).unwrap();
    let command = parser.parse_command("cancel my 3pm meeting").await.unwrap();
    assert_eq!(command.intent, CommandIntent::DeleteEvent);
    assert_eq!(command.confidence, 0.6);
    server.verify().await;
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let parser = CommandParser::new(remote_config(&server)).unwrap();
    let command = parser.parse_command("cancel my 3pm meeting").await.unwrap();
    assert_eq!(command.intent, CommandIntent::DeleteEvent);
    server.verify().await;
}

#[tokio::test]
async fn rate_limit_records_cooldown_and_bypasses_remote() {
    let server = MockServer::start().await;
    // The triggering call burns its whole attempt budget on 429s; the
    // follow-up call must not reach the server at all
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "60"))
        .expect(3)
        .mount(&server)
        .await;

    let parser = CommandParser::new(remote_config(&server)).unwrap();

    let first = parser.parse_command("cancel my 3pm meeting").await.unwrap();
    assert_eq!(first.intent, CommandIntent::DeleteEvent);

    let second = parser
        .parse_command("show my meetings this week")
        .await
        .unwrap();
    assert_eq!(second.intent, CommandIntent::ListEvents);
    server.verify().await;
}

#[tokio::test]
async fn cache_deduplicates_remote_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!({
            "intent": "DELETE_EVENT",
            "confidence": 0.9,
            "entities": {}
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let parser = CommandParser::new(remote_config(&server)).unwrap();

    let first = parser.parse_command("Cancel my 3pm meeting").await.unwrap();
    // Different casing and padding normalize to the same cache key
    let second = parser
        .parse_command("  cancel MY 3PM meeting ")
        .await
        .unwrap();

    assert_eq!(first.intent, CommandIntent::DeleteEvent);
    assert_eq!(second, first);
    server.verify().await;
}
