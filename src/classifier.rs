//! Classification of failed HTTP submissions
//!
//! Maps a non-200 HTTP status (plus whether the call was a batch) to a terminal
//! [`Status`] and the message reported to the caller. Classification is a pure
//! function; the engine turns the result into a [`PostmarkError::Submission`].
//!
//! Branches share a final classification the way layered logging does:
//! 500 and 503 are each logged as server failures and then fall through to the
//! unknown-error branch, so all three end as [`Status::Unknown`].

use tracing::error;

use crate::error::PostmarkError;
use crate::response::Status;

/// Outcome of classifying a failed submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: Status,
    pub message: String,
}

impl Classification {
    /// Convert into the error raised to the caller
    pub fn into_error(self, http_status: u16, error_code: Option<u32>) -> PostmarkError {
        PostmarkError::Submission {
            status: self.status,
            http_status,
            error_code,
            message: self.message,
        }
    }
}

/// Classify a non-200 response
///
/// `provider_message` is the `Message` field of the parsed body, empty when the
/// body had none. With `is_batch` set, 422 gets no special treatment because
/// per-message rejections are reported inside a 200 batch result instead.
pub fn classify(http_status: u16, is_batch: bool, provider_message: &str) -> Classification {
    if !is_batch && http_status == 422 {
        return Classification {
            status: Status::UserError,
            message: provider_message.to_string(),
        };
    }

    if http_status == 401 {
        let message = if provider_message.is_empty() {
            "Missing or incorrect API token in header.".to_string()
        } else {
            format!(
                "{}: Missing or incorrect API token in header.",
                provider_message
            )
        };
        error!("{}", message);
        return Classification {
            status: Status::UserError,
            message,
        };
    }

    match http_status {
        500 => {
            error!("Internal Server Error: {}", http_status);
            error!("Service Unavailable: {}", http_status);
        }
        503 => {
            error!("Service Unavailable: {}", http_status);
        }
        _ => {}
    }

    let message = if provider_message.is_empty() {
        format!("Unknown error (HTTP {}) sending email", http_status)
    } else {
        provider_message.to_string()
    };
    error!(
        "There has been an unknown error ({}) sending your email: {}",
        http_status, message
    );

    Classification {
        status: Status::Unknown,
        message,
    }
}
