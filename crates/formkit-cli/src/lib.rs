//! # formkit-cli — Form Toolkit Command-Line Interface
//!
//! ## Subcommands
//!
//! - `validate`: Check a values document against a schema file, offline
//! - `schema`: Print the schema served by the form server
//! - `submit`: Submit (or update) a record through a form session
//! - `list`: Page through stored submissions
//! - `delete`: Remove one submission
//! - `export`: Write one page of submissions as CSV
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from the handlers.
//! - Handlers take the transport and the output sink as parameters so
//!   they can run against an in-memory transport in tests.
//! - Handlers return `Ok(false)` for a negative result (invalid values,
//!   rejected submission); `main` maps that to exit code 1.

pub mod export;
pub mod records;
pub mod submit;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use formkit_client::{ClientConfig, HttpTransport};
use serde::de::DeserializeOwned;

/// Build the HTTP transport, preferring an explicit base URL over
/// `FORMKIT_API_URL`. The timeout always comes from the environment.
pub fn connect(api_url: Option<&str>) -> anyhow::Result<HttpTransport> {
    let env = ClientConfig::from_env()?;
    let config = match api_url {
        Some(url) => ClientConfig::new(url)?.with_timeout_secs(env.timeout_secs),
        None => env,
    };
    tracing::debug!(base_url = %config.base_url, "connecting");
    Ok(HttpTransport::new(config)?)
}

/// Read and parse a JSON document, naming `what` in errors.
pub fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a valid {what} document", path.display()))
}
