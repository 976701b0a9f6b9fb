//! # Form Session
//!
//! Owns the value and error maps for one schema. Every mutation goes
//! through `&mut self`, so a session has exactly one writer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use formkit_client::{ClientError, FormTransport};
use formkit_core::{FieldErrors, FieldValue, FieldValues, FormSchema};
use formkit_validate::SchemaValidator;

use crate::error::SessionError;

// ─── Submission State ────────────────────────────────────────────────

/// Where the session is in its submit cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionState {
    /// Nothing submitted yet, or reset.
    #[default]
    Idle,
    /// Values handed to the transport; awaiting its outcome.
    Submitting,
    /// The server accepted the last submission.
    Succeeded,
    /// The server or transport rejected the last submission.
    Failed,
}

impl SubmissionState {
    /// Whether a submission is awaiting its outcome.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Submitting)
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "IDLE",
            Self::Submitting => "SUBMITTING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// What a successful submission does on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitMode {
    /// Create a new record; values reset after success.
    Create,
    /// Replace an existing record's values.
    Edit {
        /// Id of the record being edited.
        record_id: String,
    },
}

impl SubmitMode {
    fn fallback_banner(&self) -> &'static str {
        match self {
            Self::Create => "Submission failed",
            Self::Edit { .. } => "Update failed",
        }
    }
}

/// Result of handing values to the transport.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The server accepted; carries its success payload.
    Accepted(Value),
    /// The server or transport refused; the session's banner and field
    /// errors have been updated from it.
    Rejected(ClientError),
}

// ─── Form Session ────────────────────────────────────────────────────

/// Values, errors, and submit state for one form.
#[derive(Debug, Clone)]
pub struct FormSession {
    validator: SchemaValidator,
    mode: SubmitMode,
    values: FieldValues,
    errors: FieldErrors,
    server_fields: BTreeSet<String>,
    banner: Option<String>,
    state: SubmissionState,
}

impl FormSession {
    /// A session for a new record. Every field starts absent.
    pub fn new(validator: SchemaValidator) -> Self {
        let values = blank_values(validator.schema());
        Self {
            validator,
            mode: SubmitMode::Create,
            values,
            errors: FieldErrors::new(),
            server_fields: BTreeSet::new(),
            banner: None,
            state: SubmissionState::Idle,
        }
    }

    /// A session editing an existing record, pre-filled with its values.
    ///
    /// Entries for ids outside the schema are kept and submitted back
    /// unchanged.
    pub fn with_values(
        validator: SchemaValidator,
        record_id: impl Into<String>,
        initial: FieldValues,
    ) -> Self {
        let mut values = blank_values(validator.schema());
        values.extend(initial);
        Self {
            validator,
            mode: SubmitMode::Edit {
                record_id: record_id.into(),
            },
            values,
            errors: FieldErrors::new(),
            server_fields: BTreeSet::new(),
            banner: None,
            state: SubmissionState::Idle,
        }
    }

    /// The schema being edited.
    pub fn schema(&self) -> &FormSchema {
        self.validator.schema()
    }

    /// Create or edit.
    pub fn mode(&self) -> &SubmitMode {
        &self.mode
    }

    /// All current values.
    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    /// Current value of one field.
    pub fn value(&self, id: &str) -> Option<&FieldValue> {
        self.values.get(id)
    }

    /// All current error messages.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Current error message for one field; `None` means valid.
    pub fn error(&self, id: &str) -> Option<&str> {
        self.errors.get(id).map(String::as_str)
    }

    /// Whether the field's current message came from the server.
    pub fn is_server_error(&self, id: &str) -> bool {
        self.server_fields.contains(id)
    }

    /// Whether any field currently shows an error.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Form-level message from the last failed submission.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Submit cycle position.
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Whether a submission is awaiting its outcome.
    pub fn is_submitting(&self) -> bool {
        self.state.is_in_flight()
    }

    /// Change a field's value and re-validate that field.
    ///
    /// Clears any server message on the field. Returns the field's new
    /// error, if any.
    pub fn set_value(
        &mut self,
        id: &str,
        value: impl Into<FieldValue>,
    ) -> Result<Option<&str>, SessionError> {
        self.require_field(id)?;
        self.values.insert(id.to_string(), value.into());
        self.server_fields.remove(id);
        self.revalidate(id);
        Ok(self.error(id))
    }

    /// Re-validate a field when it loses focus.
    ///
    /// A server message on the field is left in place.
    pub fn blur(&mut self, id: &str) -> Result<Option<&str>, SessionError> {
        self.require_field(id)?;
        if !self.server_fields.contains(id) {
            self.revalidate(id);
        }
        Ok(self.error(id))
    }

    /// Re-validate every field, replacing all messages. Returns `true`
    /// when the form is valid.
    pub fn validate_all(&mut self) -> bool {
        self.errors = self.validator.validate_all(&self.values);
        self.server_fields.clear();
        self.errors.is_empty()
    }

    /// Start a submission.
    ///
    /// Re-validates every field. On success the banner is cleared, the
    /// session moves to [`SubmissionState::Submitting`], and the values
    /// to send are returned.
    ///
    /// # Errors
    ///
    /// - [`SessionError::SubmissionInFlight`] while a submission is pending.
    /// - [`SessionError::Blocked`] when any field fails; the error map
    ///   then holds every failing field's message.
    pub fn prepare_submit(&mut self) -> Result<FieldValues, SessionError> {
        if self.state.is_in_flight() {
            return Err(SessionError::SubmissionInFlight);
        }
        if !self.validate_all() {
            let fields: Vec<String> = self
                .schema()
                .field_ids()
                .filter(|id| self.errors.contains_key(*id))
                .map(str::to_string)
                .collect();
            tracing::debug!(invalid = fields.len(), "submission blocked by local validation");
            return Err(SessionError::Blocked { fields });
        }
        self.banner = None;
        self.state = SubmissionState::Submitting;
        Ok(self.values.clone())
    }

    /// Record the transport's outcome for the pending submission.
    ///
    /// Acceptance clears errors and the banner; in create mode values
    /// return to blank. Rejection merges per-field server messages over
    /// local ones and sets the banner.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotSubmitting`] when no submission is in flight;
    /// the outcome is discarded and the session is left unchanged.
    pub fn complete_submit(
        &mut self,
        result: Result<Value, ClientError>,
    ) -> Result<SubmitOutcome, SessionError> {
        if !self.state.is_in_flight() {
            tracing::warn!(state = %self.state, "discarding outcome with no submission in flight");
            return Err(SessionError::NotSubmitting);
        }
        Ok(match result {
            Ok(payload) => {
                self.state = SubmissionState::Succeeded;
                self.banner = None;
                self.errors.clear();
                self.server_fields.clear();
                if self.mode == SubmitMode::Create {
                    self.values = blank_values(self.validator.schema());
                }
                tracing::info!(mode = ?self.mode, "form submission accepted");
                SubmitOutcome::Accepted(payload)
            }
            Err(err) => {
                self.state = SubmissionState::Failed;
                self.apply_rejection(&err);
                SubmitOutcome::Rejected(err)
            }
        })
    }

    /// Validate, send through `transport`, and record the outcome.
    ///
    /// Create mode calls [`FormTransport::submit`]; edit mode calls
    /// [`FormTransport::update_record`]. The transport is not called when
    /// validation blocks.
    pub async fn submit<T: FormTransport>(
        &mut self,
        transport: &T,
    ) -> Result<SubmitOutcome, SessionError> {
        let values = self.prepare_submit()?;
        let result = match &self.mode {
            SubmitMode::Create => transport.submit(&values).await,
            SubmitMode::Edit { record_id } => transport.update_record(record_id, &values).await,
        };
        self.complete_submit(result)
    }

    /// Return to a fresh session: values blank (create) or as they are
    /// (edit), no errors, no banner, idle.
    ///
    /// Also the way out of [`SubmissionState::Submitting`] when a
    /// [`submit`](Self::submit) future is dropped before completing.
    pub fn reset(&mut self) {
        if self.mode == SubmitMode::Create {
            self.values = blank_values(self.validator.schema());
        }
        self.errors.clear();
        self.server_fields.clear();
        self.banner = None;
        self.state = SubmissionState::Idle;
    }

    fn apply_rejection(&mut self, err: &ClientError) {
        if let Some(field_errors) = err.field_errors() {
            for (id, message) in field_errors {
                if self.validator.field(id).is_none() {
                    tracing::warn!(field = %id, "server error for a field outside the schema");
                    continue;
                }
                self.errors.insert(id.clone(), message.clone());
                self.server_fields.insert(id.clone());
            }
        }
        let banner = match err {
            ClientError::Rejected { .. } => err
                .server_message()
                .unwrap_or(self.mode.fallback_banner())
                .to_string(),
            other => other.to_string(),
        };
        tracing::warn!(banner = %banner, "form submission rejected");
        self.banner = Some(banner);
    }

    fn revalidate(&mut self, id: &str) {
        let absent = FieldValue::Absent;
        let value = self.values.get(id).unwrap_or(&absent);
        match self.validator.validate_field(id, value) {
            Some(message) => {
                self.errors.insert(id.to_string(), message);
            }
            None => {
                self.errors.remove(id);
            }
        }
    }

    fn require_field(&self, id: &str) -> Result<(), SessionError> {
        match self.validator.field(id) {
            Some(_) => Ok(()),
            None => Err(SessionError::UnknownField { id: id.to_string() }),
        }
    }
}

fn blank_values(schema: &FormSchema) -> FieldValues {
    schema
        .field_ids()
        .map(|id| (id.to_string(), FieldValue::Absent))
        .collect()
}
