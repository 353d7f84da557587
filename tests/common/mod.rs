//! Common test utilities and fixtures

#![allow(dead_code)]

use mockall::mock;
use postmark_client::config::ClientConfig;
use postmark_client::error::Result;
use postmark_client::message::Message;
use postmark_client::transport::{HttpRequest, HttpResponse, Transport};
use serde_json::json;

/// Server token used by every test client
pub const TEST_TOKEN: &str = "test-server-token";

/// Create a valid plain-text message addressed to `to`
pub fn create_test_message(to: &str, subject: &str) -> Message {
    Message::new("sender@example.com", to, subject, "Test body")
}

/// Create `count` valid messages with distinct recipients
pub fn create_test_messages(count: usize) -> Vec<Message> {
    (0..count)
        .map(|i| create_test_message(&format!("user{}@example.com", i), &format!("Message {}", i)))
        .collect()
}

/// Client configuration pointing at `base_url`
pub fn test_config(base_url: &str) -> ClientConfig {
    ClientConfig::new(TEST_TOKEN).with_base_url(base_url)
}

/// Successful single-send body as the provider returns it
pub fn mock_success_response(message_id: &str, to: &str) -> serde_json::Value {
    json!({
        "ErrorCode": 0,
        "Message": "OK",
        "MessageID": message_id,
        "SubmittedAt": "2024-01-15T10:30:00.1234567-05:00",
        "To": to
    })
}

/// Failed send body as the provider returns it
pub fn mock_error_response(error_code: u32, message: &str) -> serde_json::Value {
    json!({
        "ErrorCode": error_code,
        "Message": message
    })
}

/// Wrap a JSON value as a transport response
pub fn http_response(status: u16, body: &serde_json::Value) -> HttpResponse {
    HttpResponse::new(status, body.to_string())
}

// Mock implementation of Transport for testing
mock! {
    pub Transport {}

    #[async_trait::async_trait]
    impl Transport for Transport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_messages() {
        let messages = create_test_messages(3);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].to, "user2@example.com");
        assert!(messages.iter().all(|m| m.validate().is_ok()));
    }

    #[test]
    fn test_mock_success_response() {
        let response = mock_success_response("id-1", "a@example.com");
        assert_eq!(response["ErrorCode"], 0);
        assert_eq!(response["MessageID"], "id-1");
    }
}
