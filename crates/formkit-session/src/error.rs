//! Session error types.

use thiserror::Error;

/// Errors from form session operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The field id is not part of the session's schema.
    #[error("unknown field '{id}'")]
    UnknownField {
        /// The id that was not found.
        id: String,
    },

    /// A submission is already awaiting its outcome.
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    /// An outcome arrived with no submission awaiting one.
    #[error("no submission is in flight")]
    NotSubmitting,

    /// One or more fields failed local validation.
    #[error("submission blocked: {} field(s) invalid", .fields.len())]
    Blocked {
        /// Ids of the failing fields, in schema order.
        fields: Vec<String>,
    },
}
