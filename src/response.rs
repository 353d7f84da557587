//! Outcome of a single message submission

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error_codes::{self, ErrorCodeInfo, MAINTENANCE_CODE, SUCCESS_CODE};

/// Classification of a submission outcome
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Status {
    Success,
    /// Caller-correctable: local validation, rejected credentials, provider-side validation
    UserError,
    /// Provider-side failure
    ServerError,
    /// Batch only: the batch call succeeded but at least one member failed
    PartialFailure,
    #[default]
    Unknown,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Success => "success",
            Status::UserError => "user error",
            Status::ServerError => "server error",
            Status::PartialFailure => "partial failure",
            Status::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl Status {
    /// Status implied by a provider `ErrorCode`
    pub fn from_error_code(code: u32) -> Self {
        match code {
            SUCCESS_CODE => Status::Success,
            MAINTENANCE_CODE => Status::ServerError,
            _ => Status::UserError,
        }
    }
}

/// Provider response for one message
///
/// Deserialized from the provider's JSON body. The status is derived from the
/// body's `ErrorCode` and, for failed HTTP calls, from the error classifier.
/// It is serialized so stored batch outcomes keep each member's classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Response {
    #[serde(default)]
    pub error_code: u32,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "MessageID", default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserializers::deserialize_submitted_at",
        skip_serializing_if = "Option::is_none"
    )]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    // Absent from provider bodies; recomputed by derive_status on receipt
    #[serde(default)]
    status: Status,
}

impl Response {
    /// Build a response from a parsed body, deriving its status from the error code
    pub(crate) fn derive_status(mut self) -> Self {
        self.status = Status::from_error_code(self.error_code);
        self
    }

    /// Override the status with a classifier decision
    pub(crate) fn with_status(mut self, status: Status, message: String) -> Self {
        self.status = status;
        self.message = message;
        self
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Reference-table entry for this response's error code
    pub fn error_info(&self) -> Option<&'static ErrorCodeInfo> {
        error_codes::lookup(self.error_code)
    }
}

/// Custom deserializers for provider response fields
pub mod deserializers {
    use chrono::{DateTime, Utc};
    use serde::{
        de::{self, Deserializer},
        Deserialize,
    };

    /// Deserialize `SubmittedAt` (RFC 3339, up to 7 fractional digits, with offset)
    pub fn deserialize_submitted_at<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<String> = Option::deserialize(deserializer)?;
        match opt {
            Some(s) if !s.is_empty() => {
                let dt = DateTime::parse_from_rfc3339(&s).map_err(de::Error::custom)?;
                Ok(Some(dt.with_timezone(&Utc)))
            }
            _ => Ok(None),
        }
    }
}
