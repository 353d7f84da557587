//! Submission engine for single and batch sends
//!
//! Every call runs the same pipeline: clean and validate, serialize to the
//! provider's JSON shape, POST once through the [`Transport`], parse the body,
//! and classify failures. Nothing is retried.

use hyper::Method;
use tracing::{debug, error, info};

use crate::batch::{BatchResponse, MAX_BATCH_SIZE};
use crate::classifier;
use crate::config::ClientConfig;
use crate::error::{PostmarkError, Result};
use crate::message::{Message, WireMessage};
use crate::response::Response;
use crate::transport::{HttpRequest, HttpResponse, HyperTransport, Transport};

/// Single-message endpoint path
pub const SINGLE_ENDPOINT: &str = "/email";

/// Batch endpoint path
pub const BATCH_ENDPOINT: &str = "/email/batch";

/// Header carrying the server token
pub const SERVER_TOKEN_HEADER: &str = "X-Postmark-Server-Token";

/// Postmark API client
///
/// Holds only its configuration and transport; each send is an independent
/// request/response exchange, so one client can serve concurrent callers.
pub struct PostmarkClient<T = HyperTransport> {
    config: ClientConfig,
    transport: T,
}

impl PostmarkClient<HyperTransport> {
    /// Create a client for the production API
    ///
    /// # Arguments
    /// * `server_token` - Server token from the provider account
    pub fn new(server_token: impl Into<String>) -> Self {
        Self {
            config: ClientConfig::new(server_token),
            transport: HyperTransport::new(),
        }
    }

    /// Create a client from a validated configuration
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            transport: HyperTransport::new(),
        })
    }
}

impl<T: Transport> PostmarkClient<T> {
    /// Create a client with a custom transport
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a plain-text message built from the required fields
    pub async fn send_email(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<Response> {
        self.send_message(&Message::new(from, to, subject, body)).await
    }

    /// Send one message
    ///
    /// Returns the provider response when the HTTP status is 200. Any other
    /// status is raised as [`PostmarkError::Submission`] carrying the
    /// classified status; there is no way to get a failed single send back as
    /// a `Response`.
    ///
    /// The caller's message is not modified; a cleaned copy is submitted.
    pub async fn send_message(&self, message: &Message) -> Result<Response> {
        let result = self.submit_single(message).await;
        if let Err(e) = &result {
            error!("There has been an error sending your email: {}", e);
        }
        result
    }

    /// Send up to 500 messages in one call
    ///
    /// All messages are validated before anything is sent; the first invalid
    /// message fails the whole batch. Once the provider accepts the batch
    /// (HTTP 200) this returns normally even if some members failed: check
    /// [`BatchResponse::status`] and each member's status.
    pub async fn send_batch(&self, messages: &[Message]) -> Result<BatchResponse> {
        let result = self.submit_batch(messages).await;
        if let Err(e) = &result {
            error!("There has been an error sending your batch: {}", e);
        }
        result
    }

    async fn submit_single(&self, message: &Message) -> Result<Response> {
        let mut message = message.clone();
        message.clean();
        message.validate()?;

        let payload = serde_json::to_string(&message.to_wire())?;
        debug!("Message contents: {}", payload);

        let http = self
            .transport
            .execute(self.build_request(SINGLE_ENDPOINT, payload))
            .await?;
        debug!("Message response ({}): {}", http.status, http.body);

        if http.status != 200 {
            return Err(classify_failure(&http, false));
        }

        let response: Response = serde_json::from_str(&http.body)
            .map_err(|e| PostmarkError::transport("Malformed response body", e))?;
        let response = response.derive_status();

        info!(
            "Message submitted: id={} status={}",
            response.message_id.as_deref().unwrap_or("-"),
            response.status()
        );
        Ok(response)
    }

    async fn submit_batch(&self, messages: &[Message]) -> Result<BatchResponse> {
        if messages.len() > MAX_BATCH_SIZE {
            return Err(PostmarkError::Validation(format!(
                "Too many messages. API is limited to {}.",
                MAX_BATCH_SIZE
            )));
        }
        if messages.is_empty() {
            return Err(PostmarkError::Validation(
                "Batch contains no messages".to_string(),
            ));
        }

        let mut cleaned = Vec::with_capacity(messages.len());
        for (index, message) in messages.iter().enumerate() {
            let mut message = message.clone();
            message.clean();
            if let Err(e) = message.validate() {
                debug!("Batch message {} failed validation", index);
                return Err(e);
            }
            cleaned.push(message);
        }

        let wire: Vec<WireMessage<'_>> = cleaned.iter().map(Message::to_wire).collect();
        let payload = serde_json::to_string(&wire)?;
        debug!("Batch of {} messages, {} bytes", cleaned.len(), payload.len());

        let http = self
            .transport
            .execute(self.build_request(BATCH_ENDPOINT, payload))
            .await?;
        debug!("Batch response ({}): {}", http.status, http.body);

        if http.status != 200 {
            return Err(classify_failure(&http, true));
        }

        let responses: Vec<Response> = serde_json::from_str(&http.body)
            .map_err(|e| PostmarkError::transport("Malformed batch response body", e))?;
        if responses.len() != messages.len() {
            return Err(PostmarkError::malformed(format!(
                "Batch response has {} results for {} messages",
                responses.len(),
                messages.len()
            )));
        }

        let batch = BatchResponse::from_responses(responses);
        info!(
            "Batch submitted: {} messages, status={}",
            batch.responses.len(),
            batch.status
        );
        Ok(batch)
    }

    fn build_request(&self, path: &str, body: String) -> HttpRequest {
        let url = format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path);
        HttpRequest {
            method: Method::POST,
            url,
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
                (
                    SERVER_TOKEN_HEADER.to_string(),
                    self.config.server_token.clone(),
                ),
                ("User-Agent".to_string(), self.config.user_agent.clone()),
            ],
            body,
        }
    }
}

/// Turn a non-200 exchange into the error raised to the caller
///
/// The body usually carries `ErrorCode` and `Message` even on failure; when it
/// does not parse, the classifier synthesizes a message.
fn classify_failure(http: &HttpResponse, is_batch: bool) -> PostmarkError {
    let parsed = serde_json::from_str::<Response>(&http.body).ok();
    let error_code = parsed.as_ref().map(|r| r.error_code);
    let provider = parsed.unwrap_or_default();

    let classification = classifier::classify(http.status, is_batch, &provider.message);
    let classified = provider.with_status(classification.status, classification.message);
    debug!(
        "HTTP {} classified as {}: {}",
        http.status,
        classified.status(),
        classified.message
    );

    PostmarkError::Submission {
        status: classified.status(),
        http_status: http.status,
        error_code,
        message: classified.message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Status;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Transport that replays canned responses and records requests
    struct StubTransport {
        responses: Mutex<Vec<Result<HttpResponse>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl StubTransport {
        fn new(responses: Vec<Result<HttpResponse>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.requests.lock().unwrap().push(request);
            self.responses.lock().unwrap().remove(0)
        }
    }

    fn client(responses: Vec<Result<HttpResponse>>) -> PostmarkClient<StubTransport> {
        PostmarkClient::with_transport(
            ClientConfig::new("server-token").with_base_url("https://api.example.com/"),
            StubTransport::new(responses),
        )
    }

    fn message() -> Message {
        Message::new("sender@example.com", "receiver@example.com", "Hi", "Body")
    }

    #[tokio::test]
    async fn test_request_headers_and_url() {
        let client = client(vec![Ok(HttpResponse::new(
            200,
            r#"{"ErrorCode":0,"Message":"OK","MessageID":"id-1"}"#,
        ))]);

        client.send_message(&message()).await.unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "https://api.example.com/email");
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.header(SERVER_TOKEN_HEADER), Some("server-token"));
        assert!(request.header("User-Agent").unwrap().starts_with("postmark-rust/"));
    }

    #[tokio::test]
    async fn test_send_message_sends_cleaned_copy() {
        let client = client(vec![Ok(HttpResponse::new(200, r#"{"ErrorCode":0,"Message":"OK"}"#))]);
        let original = Message::new(" sender@example.com ", "a@example.com;b@example.com", "Hi", "Body")
            .with_tag("  ");

        client.send_message(&original).await.unwrap();

        assert_eq!(original.from, " sender@example.com ");
        let body: serde_json::Value =
            serde_json::from_str(&client.transport().requests()[0].body).unwrap();
        assert_eq!(body["From"], "sender@example.com");
        assert_eq!(body["To"], "a@example.com, b@example.com");
        assert!(body.get("Tag").is_none());
    }

    #[tokio::test]
    async fn test_200_with_error_code_is_returned_not_raised() {
        let client = client(vec![Ok(HttpResponse::new(
            200,
            r#"{"ErrorCode":100,"Message":"Maintenance"}"#,
        ))]);

        let response = client.send_message(&message()).await.unwrap();
        assert_eq!(response.status(), Status::ServerError);
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_transport_error() {
        let client = client(vec![Ok(HttpResponse::new(200, "<html>oops</html>"))]);
        let result = client.send_message(&message()).await;
        assert!(matches!(result, Err(PostmarkError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_unparseable_error_body_still_classified() {
        let client = client(vec![Ok(HttpResponse::new(503, "Service Unavailable"))]);
        match client.send_message(&message()).await {
            Err(PostmarkError::Submission {
                status,
                http_status,
                error_code,
                message,
            }) => {
                assert_eq!(status, Status::Unknown);
                assert_eq!(http_status, 503);
                assert_eq!(error_code, None);
                assert!(message.contains("503"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_message_never_reaches_transport() {
        let client = client(Vec::new());
        let mut invalid = message();
        invalid.to = String::new();

        let result = client.send_message(&invalid).await;
        assert!(matches!(result, Err(PostmarkError::Validation(_))));
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let client = client(Vec::new());
        let result = client.send_batch(&[]).await;
        assert!(matches!(result, Err(PostmarkError::Validation(_))));
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_batch_length_mismatch_is_transport_error() {
        let client = client(vec![Ok(HttpResponse::new(
            200,
            r#"[{"ErrorCode":0,"Message":"OK"}]"#,
        ))]);

        let result = client.send_batch(&[message(), message()]).await;
        assert!(matches!(result, Err(PostmarkError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_batch_uses_batch_endpoint() {
        let client = client(vec![Ok(HttpResponse::new(
            200,
            r#"[{"ErrorCode":0,"Message":"OK"},{"ErrorCode":0,"Message":"OK"}]"#,
        ))]);

        let batch = client.send_batch(&[message(), message()]).await.unwrap();
        assert_eq!(batch.status, Status::Success);

        let request = &client.transport().requests()[0];
        assert_eq!(request.url, "https://api.example.com/email/batch");
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let client = client(vec![Err(PostmarkError::malformed("connection reset"))]);
        let result = client.send_message(&message()).await;
        assert!(matches!(result, Err(PostmarkError::Transport { .. })));
    }

    #[test]
    fn test_classify_failure_keeps_provider_code() {
        let http = HttpResponse::new(422, r#"{"ErrorCode": 406, "Message": "Inactive recipient"}"#);
        match classify_failure(&http, false) {
            PostmarkError::Submission {
                status,
                http_status,
                error_code,
                message,
            } => {
                assert_eq!(status, Status::UserError);
                assert_eq!(http_status, 422);
                assert_eq!(error_code, Some(406));
                assert_eq!(message, "Inactive recipient");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_classify_failure_without_body() {
        let http = HttpResponse::new(503, "<html>down</html>");
        match classify_failure(&http, true) {
            PostmarkError::Submission {
                status,
                error_code,
                message,
                ..
            } => {
                assert_eq!(status, Status::Unknown);
                assert_eq!(error_code, None);
                assert_eq!(message, "Unknown error (HTTP 503) sending email");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
