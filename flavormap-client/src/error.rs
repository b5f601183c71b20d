//! Error types for the FlavorMap client
//!
//! Read failures never reach callers as errors: the source loader recovers
//! from every `TransportError` by falling back, and malformed data is logged
//! and replaced by an empty sequence. Only a submission can fail, and only in
//! the two ways `SubmitError` names.

use thiserror::Error;

use crate::status::StatusMessage;

/// Failure talking to the primary or secondary source
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Request never produced a response (connection refused, DNS, timeout)
    #[error("Network error: {0}")]
    Unreachable(String),

    /// Response with a non-success status, with the body's `error` text if any
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Status { status: u16, message: Option<String> },

    /// Response body was not the expected JSON shape
    #[error("Malformed response body: {0}")]
    MalformedBody(String),
}

impl TransportError {
    /// Error text the server sent with a non-success response
    pub fn server_message(&self) -> Option<&str> {
        match self {
            TransportError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Submission failure surfaced to the user
#[derive(Error, Debug)]
pub enum SubmitError {
    /// Coordinate input did not parse to finite numbers; nothing was sent or stored
    #[error("Lat/Lng must be numbers (invalid {field})")]
    Validation { field: &'static str },

    /// Remote write failed and the on-device fallback could not be persisted
    #[error("Failed to save spot: {0}")]
    LocalSave(#[source] flavormap_common::Error),
}

impl SubmitError {
    /// Message to show the user for this failure
    pub fn status(&self) -> StatusMessage {
        match self {
            SubmitError::Validation { .. } => StatusMessage::InvalidCoordinates,
            SubmitError::LocalSave(e) => StatusMessage::Failed(e.to_string()),
        }
    }
}
