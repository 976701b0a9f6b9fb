//! # Validate Subcommand
//!
//! Offline check of a values document against a schema file, using the
//! same engine a form session uses.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use formkit_core::{FieldValues, FormSchema};
use formkit_validate::SchemaValidator;
use serde_json::json;

use crate::read_json;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Form schema document (JSON).
    #[arg(long)]
    pub schema: PathBuf,

    /// Values document: a JSON object keyed by field id.
    #[arg(long)]
    pub values: PathBuf,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Validate the values document. Returns `Ok(false)` when any field fails.
pub fn run_validate<W: Write>(args: &ValidateArgs, out: &mut W) -> anyhow::Result<bool> {
    let schema: FormSchema = read_json(&args.schema, "schema")?;
    let values: FieldValues = read_json(&args.values, "values")?;
    let validator = SchemaValidator::new(schema)?;

    for id in values.keys().filter(|id| validator.field(id).is_none()) {
        tracing::warn!(field = %id, "value has no field in the schema; ignored");
    }
    let errors = validator.validate_all(&values);

    if args.json {
        let report = json!({ "valid": errors.is_empty(), "errors": errors });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(errors.is_empty());
    }

    let schema = validator.schema();
    if errors.is_empty() {
        writeln!(out, "{}: all {} field(s) valid", schema.title, schema.fields.len())?;
        return Ok(true);
    }
    writeln!(
        out,
        "{}: {} of {} field(s) invalid",
        schema.title,
        errors.len(),
        schema.fields.len()
    )?;
    let width = errors.keys().map(|id| id.len()).max().unwrap_or(0);
    for field in &schema.fields {
        if let Some(message) = errors.get(&field.id) {
            writeln!(out, "  {:width$}  {message}", field.id)?;
        }
    }
    Ok(false)
}
