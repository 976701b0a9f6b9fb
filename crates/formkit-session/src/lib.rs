//! # formkit-session — Form Session State
//!
//! The live state of one form being edited: current values, the error
//! message (if any) for each field, a form-level banner, and the
//! submission state.
//!
//! ## Validation Triggers
//!
//! - **change** ([`FormSession::set_value`]) re-validates that field only.
//! - **blur** ([`FormSession::blur`]) re-validates that field unless it
//!   currently shows a server message.
//! - **submit** ([`FormSession::prepare_submit`]) re-validates every field
//!   and blocks while any field fails.
//!
//! ## Server Errors
//!
//! Per-field messages from a rejected submission overwrite the local
//! result for that field and stay until the next local change.
//!
//! ## Submission States
//!
//! ```text
//! Idle ──▶ Submitting ──▶ Succeeded
//!   ▲          │
//!   │          └──▶ Failed ──▶ Submitting (retry by user)
//!   └── reset()
//! ```
//!
//! Only one submission may be in flight per session.

pub mod error;
pub mod session;

pub use error::SessionError;
pub use session::{FormSession, SubmissionState, SubmitMode, SubmitOutcome};
