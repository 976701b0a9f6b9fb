//! # formkit-client — Form Server Transport
//!
//! The operations a form client consumes from its server, expressed as
//! the [`FormTransport`] trait, plus [`HttpTransport`], the `reqwest`
//! implementation that talks to a JSON API:
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | `fetch_schema` | GET | `{base}/form-schema` |
//! | `submit` | POST | `{base}/submissions` |
//! | `list` | GET | `{base}/submissions?page&limit&sortBy&sortOrder[&search]` |
//! | `update_record` | PUT | `{base}/submissions/{id}` |
//! | `delete_record` | DELETE | `{base}/submissions/{id}` |
//!
//! ## Error Handling
//!
//! Fetch failures (schema, listing) carry only the status. Mutations
//! that the server rejects carry the parsed [`ApiErrorBody`](formkit_core::ApiErrorBody)
//! so per-field messages can be merged into a form session.
//!
//! ## Retry
//!
//! None. Each call is one request; retry policy belongs to the caller.

pub mod config;
pub mod error;
pub mod http;
pub mod transport;

pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
pub use http::HttpTransport;
pub use transport::FormTransport;
