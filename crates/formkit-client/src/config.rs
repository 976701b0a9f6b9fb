//! Client configuration.
//!
//! Read from the environment or built directly:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `FORMKIT_API_URL` | `http://localhost:3000/api` |
//! | `FORMKIT_TIMEOUT_SECS` | `30` |

use url::Url;

/// Default API base when `FORMKIT_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Invalid client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The base URL does not parse.
    #[error("invalid API base URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },
    /// The timeout is not a positive integer.
    #[error("invalid timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Connection settings for [`HttpTransport`](crate::HttpTransport).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base, e.g. `http://localhost:3000/api`.
    pub base_url: Url,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Configuration for a base URL with the default timeout.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|e| ConfigError::InvalidUrl {
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            base_url,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Configuration from `FORMKIT_API_URL` and `FORMKIT_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = std::env::var("FORMKIT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let mut config = Self::new(&base)?;
        if let Ok(raw) = std::env::var("FORMKIT_TIMEOUT_SECS") {
            config.timeout_secs = parse_timeout(&raw)?;
        }
        Ok(config)
    }

    /// Override the timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// `{base}/{path}` with exactly one separating slash.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// `{base}/submissions/{id}` with `id` percent-encoded as a single
    /// path segment, so `/`, `?`, and `#` in an id stay inside it.
    ///
    /// `None` for an id the path cannot carry (empty, `.`, `..`) or a
    /// base URL that cannot hold path segments.
    pub(crate) fn record_endpoint(&self, id: &str) -> Option<String> {
        if matches!(id, "" | "." | "..") {
            return None;
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .push("submissions")
            .push(id);
        Some(url.into())
    }
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .ok_or_else(|| ConfigError::InvalidTimeout(raw.to_string()))
}
