//! Aggregate outcome of a batch submission

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::response::{Response, Status};

/// Maximum number of messages accepted in one batch call
pub const MAX_BATCH_SIZE: usize = 500;

/// Result of a batch call that the provider accepted (HTTP 200)
///
/// `responses` lines up one-to-one with the submitted messages. Member
/// failures do not raise; they show up as [`Status::PartialFailure`] here and
/// in each member's own status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchResponse {
    pub responses: Vec<Response>,
    pub message: String,
    pub status: Status,
}

impl BatchResponse {
    /// Reconcile per-message responses into one outcome
    pub fn from_responses(responses: Vec<Response>) -> Self {
        let mut failures = Vec::new();

        let responses: Vec<Response> = responses
            .into_iter()
            .enumerate()
            .map(|(index, response)| {
                let response = response.derive_status();
                if !response.is_success() {
                    warn!(
                        "Batch message {} failed (ErrorCode {}): {}",
                        index, response.error_code, response.message
                    );
                    failures.push(response.message.clone());
                }
                response
            })
            .collect();

        let status = if failures.is_empty() {
            Status::Success
        } else {
            Status::PartialFailure
        };

        Self {
            responses,
            message: failures.join("; "),
            status,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Responses for members that failed, with their position in the batch
    pub fn failures(&self) -> impl Iterator<Item = (usize, &Response)> {
        self.responses
            .iter()
            .enumerate()
            .filter(|(_, response)| !response.is_success())
    }
}
