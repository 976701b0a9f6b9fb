//! # formkit CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use formkit_cli::{connect, export, records, submit, validate};
use tracing_subscriber::EnvFilter;

/// Form toolkit CLI: validate, submit, and manage schema-driven form records.
#[derive(Parser, Debug)]
#[command(name = "formkit", version, about)]
struct Cli {
    /// Form server base URL.
    #[arg(long, global = true, env = "FORMKIT_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate a values document against a schema file.
    Validate(validate::ValidateArgs),
    /// Print the form schema served by the server.
    Schema,
    /// Submit a values document, or update an existing record.
    Submit(submit::SubmitArgs),
    /// List stored submissions.
    List(records::ListArgs),
    /// Delete a submission.
    Delete(records::DeleteArgs),
    /// Export one page of submissions as CSV.
    Export(export::ExportArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut out = std::io::stdout().lock();

    let ok = match cli.command {
        Commands::Validate(args) => validate::run_validate(&args, &mut out)?,
        Commands::Schema => {
            let transport = connect(cli.api_url.as_deref())?;
            records::run_schema(&transport, &mut out).await?
        }
        Commands::Submit(args) => {
            let transport = connect(cli.api_url.as_deref())?;
            submit::run_submit(&transport, &args, &mut out).await?
        }
        Commands::List(args) => {
            let transport = connect(cli.api_url.as_deref())?;
            records::run_list(&transport, &args, &mut out).await?
        }
        Commands::Delete(args) => {
            let transport = connect(cli.api_url.as_deref())?;
            records::run_delete(&transport, &args, &mut out).await?
        }
        Commands::Export(args) => {
            let transport = connect(cli.api_url.as_deref())?;
            let today = chrono::Utc::now().date_naive();
            export::run_export(&transport, &args, today, &mut out).await?
        }
    };
    out.flush()?;

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
