//! Transport error types.

use formkit_core::{ApiErrorBody, FieldErrors};

/// Errors from form server calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// A read (schema or listing) returned a non-2xx status.
    #[error("Failed to fetch {resource} (HTTP {status})")]
    Fetch { resource: &'static str, status: u16 },
    /// A mutation was rejected with a structured body.
    #[error("{}", .body.error.as_deref().unwrap_or("request rejected"))]
    Rejected {
        endpoint: String,
        status: u16,
        body: ApiErrorBody,
    },
    /// A mutation was rejected with a body that is not a structured error.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// A 2xx response body did not decode.
    #[error("failed to decode response from {endpoint}: {reason}")]
    Deserialization { endpoint: String, reason: String },
    /// A record id that cannot be addressed as one path segment.
    #[error("invalid record id '{id}'")]
    InvalidRecordId { id: String },
    /// The client could not be configured.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl ClientError {
    /// Per-field messages carried by a structured rejection.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Rejected { body, .. } => body.errors.as_ref(),
            _ => None,
        }
    }

    /// Form-level message carried by a structured rejection, if the
    /// server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { body, .. } => body.error.as_deref(),
            _ => None,
        }
    }
}
