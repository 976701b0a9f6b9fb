//! # Record Subcommands
//!
//! `schema`, `list`, and `delete`: thin handlers over a [`FormTransport`].

use std::io::Write;

use clap::Args;
use formkit_client::FormTransport;
use formkit_core::{ListQuery, PaginatedResponse, SortOrder, Submission};

/// Listing flags shared by `list` and `export`.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Page size.
    #[arg(long, default_value_t = 10)]
    pub limit: u32,

    /// Creation-time sort order: `asc` or `desc`.
    #[arg(long, default_value_t = SortOrder::Desc)]
    pub order: SortOrder,

    /// Case-insensitive filter over values and ids.
    #[arg(long)]
    pub search: Option<String>,

    /// Print the raw page as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// The listing request these flags describe.
    pub fn to_query(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            limit: self.limit,
            sort_order: self.order,
            search: self.search.clone().filter(|s| !s.is_empty()),
            ..ListQuery::default()
        }
    }
}

/// Arguments for the delete subcommand.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Id of the submission to remove.
    pub id: String,
}

/// Print the server's schema as pretty JSON.
pub async fn run_schema<T: FormTransport, W: Write>(
    transport: &T,
    out: &mut W,
) -> anyhow::Result<bool> {
    let schema = transport.fetch_schema().await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&schema)?)?;
    Ok(true)
}

/// Print one page of submissions.
pub async fn run_list<T: FormTransport, W: Write>(
    transport: &T,
    args: &ListArgs,
    out: &mut W,
) -> anyhow::Result<bool> {
    let page = transport.list(&args.to_query()).await?;
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&page)?)?;
    } else {
        render_page(&page, out)?;
    }
    Ok(true)
}

/// Delete one submission. A server rejection is reported, not raised.
pub async fn run_delete<T: FormTransport, W: Write>(
    transport: &T,
    args: &DeleteArgs,
    out: &mut W,
) -> anyhow::Result<bool> {
    match transport.delete_record(&args.id).await {
        Ok(_) => {
            writeln!(out, "deleted {}", args.id)?;
            Ok(true)
        }
        Err(err) => match err.server_message() {
            Some(message) => {
                writeln!(out, "{}: {message}", args.id)?;
                Ok(false)
            }
            None => Err(err.into()),
        },
    }
}

/// Plain-text table: id, creation time, then a one-line summary of values.
pub fn render_page<W: Write>(page: &PaginatedResponse, out: &mut W) -> std::io::Result<()> {
    if page.data.is_empty() {
        writeln!(out, "No submissions found.")?;
    } else {
        let width = page.data.iter().map(|s| s.id.len()).max().unwrap_or(0);
        for submission in &page.data {
            writeln!(
                out,
                "{:width$}  {}  {}",
                submission.id,
                submission.created_at.format("%Y-%m-%d %H:%M"),
                summary(submission)
            )?;
        }
    }
    let p = &page.pagination;
    writeln!(
        out,
        "page {} of {} ({} total)",
        p.page,
        p.total_pages.max(1),
        p.total_count
    )
}

fn summary(submission: &Submission) -> String {
    submission
        .data
        .iter()
        .filter(|(_, v)| !v.is_blank())
        .map(|(k, v)| format!("{k}={}", v.display()))
        .collect::<Vec<_>>()
        .join(" ")
}
