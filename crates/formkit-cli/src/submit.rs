//! # Submit Subcommand
//!
//! Fills a form session from a values document and submits it through
//! the transport, so local validation, the server round trip, and server
//! field errors all follow the session's rules.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use formkit_client::FormTransport;
use formkit_core::FieldValues;
use formkit_session::{FormSession, SessionError, SubmitOutcome};
use formkit_validate::SchemaValidator;

use crate::read_json;

/// Arguments for the submit subcommand.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Values document: a JSON object keyed by field id.
    #[arg(long)]
    pub values: PathBuf,

    /// Update this existing record instead of creating a new one.
    #[arg(long)]
    pub record: Option<String>,
}

/// Submit the values document. Returns `Ok(false)` when local validation
/// blocks the submission or the server rejects it.
pub async fn run_submit<T: FormTransport, W: Write>(
    transport: &T,
    args: &SubmitArgs,
    out: &mut W,
) -> anyhow::Result<bool> {
    let values: FieldValues = read_json(&args.values, "values")?;
    let validator = SchemaValidator::new(transport.fetch_schema().await?)?;

    let mut session = match &args.record {
        Some(id) => FormSession::with_values(validator, id.as_str(), FieldValues::new()),
        None => FormSession::new(validator),
    };
    for (id, value) in values {
        session.set_value(&id, value)?;
    }

    match session.submit(transport).await {
        Ok(SubmitOutcome::Accepted(body)) => {
            match body.pointer("/data/id").and_then(|v| v.as_str()) {
                Some(id) => writeln!(out, "saved {id}")?,
                None => writeln!(out, "saved")?,
            }
            Ok(true)
        }
        Ok(SubmitOutcome::Rejected(err)) => {
            if err.server_message().is_none() && err.field_errors().is_none() {
                return Err(err.into());
            }
            if let Some(banner) = session.banner() {
                writeln!(out, "{banner}")?;
            }
            write_errors(&session, out)?;
            Ok(false)
        }
        Err(SessionError::Blocked { .. }) => {
            writeln!(out, "not submitted: fix the fields below")?;
            write_errors(&session, out)?;
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

fn write_errors<W: Write>(session: &FormSession, out: &mut W) -> std::io::Result<()> {
    for field in &session.schema().fields {
        if let Some(message) = session.error(&field.id) {
            writeln!(out, "  {}  {message}", field.id)?;
        }
    }
    Ok(())
}
