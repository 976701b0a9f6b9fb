//! # Export Subcommand
//!
//! Writes one listing page as CSV. The header is `ID,Created Date`
//! followed by the data keys of the first record; every value is quoted.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use formkit_client::FormTransport;
use formkit_core::{FieldValue, Submission};

use crate::records::ListArgs;

/// Arguments for the export subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub list: ListArgs,

    /// Output file. Defaults to `submissions_<today>.csv`.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// `submissions_YYYY-MM-DD.csv`
pub fn default_filename(date: NaiveDate) -> String {
    format!("submissions_{}.csv", date.format("%Y-%m-%d"))
}

/// Render records as CSV, or `None` when there is nothing to export.
///
/// Columns follow the first record's keys; a later record missing one
/// of them gets an empty quoted cell.
pub fn to_csv(records: &[Submission]) -> Option<String> {
    let first = records.first()?;
    let keys: Vec<&str> = first.data.keys().map(String::as_str).collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    let mut header = vec!["ID".to_string(), "Created Date".to_string()];
    header.extend(keys.iter().map(|k| escape_bare(k)));
    lines.push(header.join(","));

    for record in records {
        let mut row = vec![
            escape_bare(&record.id),
            record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ];
        row.extend(
            keys.iter()
                .map(|k| quote_cell(record.data.get(*k).unwrap_or(&FieldValue::Absent))),
        );
        lines.push(row.join(","));
    }
    Some(lines.join("\n"))
}

fn quote_cell(value: &FieldValue) -> String {
    let text = match value {
        FieldValue::Sequence(items) => items.join("; "),
        other => other.to_text(),
    };
    quote(&text)
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Header keys and ids stay bare unless they would split or break a row.
fn escape_bare(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        quote(text)
    } else {
        text.to_string()
    }
}

/// Fetch one page and write it as CSV.
///
/// Returns `Ok(false)` without creating a file when the page is empty.
pub async fn run_export<T: FormTransport, W: Write>(
    transport: &T,
    args: &ExportArgs,
    today: NaiveDate,
    out: &mut W,
) -> anyhow::Result<bool> {
    let page = transport.list(&args.list.to_query()).await?;
    let Some(csv) = to_csv(&page.data) else {
        writeln!(out, "No submissions to export.")?;
        return Ok(false);
    };

    let path = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_filename(today)));
    write_file(&path, &csv)?;
    tracing::info!(path = %path.display(), rows = page.data.len(), "export written");
    writeln!(out, "wrote {} submission(s) to {}", page.data.len(), path.display())?;
    Ok(true)
}

fn write_file(path: &Path, csv: &str) -> anyhow::Result<()> {
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))
}
