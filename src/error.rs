use thiserror::Error;

use crate::error_codes::{self, ErrorCodeInfo};
use crate::response::Status;

/// Type alias for Result with PostmarkError
pub type Result<T> = std::result::Result<T, PostmarkError>;

/// Boxed underlying cause carried by transport failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error types for the Postmark client
#[derive(Error, Debug)]
pub enum PostmarkError {
    /// Caller-fixable input problem, detected before any network call
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Network or connection level failure, or a response that could not be read
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A response was obtained but the provider reported a failure
    #[error("Submission failed ({status}, HTTP {http_status}): {message}")]
    Submission {
        status: Status,
        http_status: u16,
        error_code: Option<u32>,
        message: String,
    },

    /// Request payload could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (config files, attachments)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PostmarkError {
    /// Build a transport error that keeps the underlying cause
    pub fn transport<E>(message: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        PostmarkError::Transport {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Build a transport error for a response that did not have the expected shape
    pub fn malformed(message: impl Into<String>) -> Self {
        PostmarkError::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Status classification for this failure, if it has one
    ///
    /// Validation failures are always the caller's to fix, so they report
    /// [`Status::UserError`]. Transport and local errors never reached a
    /// classification and return `None`.
    pub fn status(&self) -> Option<Status> {
        match self {
            PostmarkError::Validation(_) => Some(Status::UserError),
            PostmarkError::Submission { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the error is transient and a later attempt may succeed
    ///
    /// The client never retries on its own; this is for callers that wrap
    /// submissions in their own retry loop.
    pub fn is_transient(&self) -> bool {
        match self {
            PostmarkError::Transport { .. } => true,
            PostmarkError::Submission {
                status, http_status, ..
            } => *status == Status::ServerError || *http_status >= 500,
            _ => false,
        }
    }

    /// Reference-table entry for the provider error code, if one was returned
    pub fn error_code_info(&self) -> Option<&'static ErrorCodeInfo> {
        match self {
            PostmarkError::Submission {
                error_code: Some(code),
                ..
            } => error_codes::lookup(*code),
            _ => None,
        }
    }
}
