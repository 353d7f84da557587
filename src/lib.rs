//! Postmark Client
//!
//! A client library for the Postmark transactional email API: build messages,
//! submit them one at a time or in batches of up to 500, and get typed results
//! with the provider's error taxonomy mapped to a small status model.
//!
//! # Overview
//!
//! - **Messages**: cleaning (whitespace and empty-field normalization) and
//!   validation run before anything touches the network
//! - **Single send**: returns a [`Response`] on HTTP 200, raises
//!   [`PostmarkError::Submission`] for any other status
//! - **Batch send**: returns a [`BatchResponse`] whose status is
//!   [`Status::PartialFailure`] when some members were rejected
//! - **Error codes**: read-only reference table for provider `ErrorCode` values
//!
//! # Example Usage
//!
//! ```no_run
//! use postmark_client::{Message, PostmarkClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PostmarkClient::new("server-token");
//!
//!     let message = Message::new(
//!         "sender@example.com",
//!         "receiver@example.com",
//!         "Welcome",
//!         "Thanks for signing up.",
//!     )
//!     .with_tag("welcome")
//!     .with_header("X-Campaign", "onboarding");
//!
//!     let response = client.send_message(&message).await?;
//!     println!("Sent {:?}", response.message_id);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`batch`] - Batch outcome reconciliation
//! - [`classifier`] - HTTP failure classification
//! - [`cli`] - Command-line interface for the `postmark` binary
//! - [`client`] - Submission engine
//! - [`config`] - Client configuration
//! - [`error`] - Error types and result aliases
//! - [`error_codes`] - Provider error-code reference table
//! - [`message`] - Message model, cleaning and validation
//! - [`response`] - Per-message response and status
//! - [`transport`] - HTTP transport trait and hyper implementation

pub mod batch;
pub mod classifier;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod error_codes;
pub mod message;
pub mod response;
pub mod transport;

// Re-export commonly used types for convenience
pub use error::{PostmarkError, Result};

// Core data models
pub use batch::{BatchResponse, MAX_BATCH_SIZE};
pub use message::{Attachment, Header, Message};
pub use response::{Response, Status};

// Engine and transport
pub use client::PostmarkClient;
pub use transport::{HttpRequest, HttpResponse, HyperTransport, Transport};

// Config types
pub use config::{ClientConfig, TEST_SERVER_TOKEN};

// Reference data
pub use error_codes::ErrorCodeInfo;

// CLI types (for binary usage)
pub use cli::{Cli, Commands};
