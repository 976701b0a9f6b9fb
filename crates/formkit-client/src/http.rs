//! # HTTP Transport
//!
//! [`FormTransport`] over `reqwest`. Bodies are JSON in both directions.
//!
//! Reads (schema, listing) map any non-2xx status to
//! [`ClientError::Fetch`]. Mutations (submit, update, delete) parse a
//! non-2xx body as an [`ApiErrorBody`] so field-level messages survive;
//! a body that is not JSON becomes [`ClientError::Status`].

use std::time::Duration;

use formkit_core::{ApiErrorBody, FieldValues, FormSchema, ListQuery, PaginatedResponse};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transport::FormTransport;

/// `reqwest`-backed form server client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Build a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: config.base_url.to_string(),
                source: e,
            })?;
        Ok(Self { client, config })
    }

    /// Build a client from `FORMKIT_API_URL` / `FORMKIT_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// The configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn record_url(&self, id: &str) -> Result<String, ClientError> {
        self.config
            .record_endpoint(id)
            .ok_or_else(|| ClientError::InvalidRecordId { id: id.to_string() })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<reqwest::Response, ClientError> {
        tracing::debug!(endpoint, "sending form server request");
        request.send().await.map_err(|e| ClientError::Http {
            endpoint: endpoint.to_string(),
            source: e,
        })
    }

    async fn read<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
        resource: &'static str,
    ) -> Result<T, ClientError> {
        let resp = self.send(request, endpoint).await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(endpoint, status = status.as_u16(), "fetch failed");
            return Err(ClientError::Fetch {
                resource,
                status: status.as_u16(),
            });
        }
        resp.json::<T>()
            .await
            .map_err(|e| ClientError::Deserialization {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })
    }

    async fn mutate(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<Value, ClientError> {
        let resp = self.send(request, endpoint).await?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| ClientError::Http {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ApiErrorBody>(&text) {
                Ok(body) => {
                    tracing::warn!(
                        endpoint,
                        status = status.as_u16(),
                        field_errors = body.errors.as_ref().map_or(0, |e| e.len()),
                        "server rejected request"
                    );
                    ClientError::Rejected {
                        endpoint: endpoint.to_string(),
                        status: status.as_u16(),
                        body,
                    }
                }
                Err(_) => ClientError::Status {
                    endpoint: endpoint.to_string(),
                    status: status.as_u16(),
                    body: text,
                },
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ClientError::Deserialization {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

impl FormTransport for HttpTransport {
    async fn fetch_schema(&self) -> Result<FormSchema, ClientError> {
        let url = self.config.endpoint("form-schema");
        self.read(self.client.get(&url), &url, "form schema").await
    }

    async fn submit(&self, values: &FieldValues) -> Result<Value, ClientError> {
        let url = self.config.endpoint("submissions");
        self.mutate(self.client.post(&url).json(values), &url).await
    }

    async fn update_record(&self, id: &str, values: &FieldValues) -> Result<Value, ClientError> {
        let url = self.record_url(id)?;
        self.mutate(self.client.put(&url).json(values), &url).await
    }

    async fn list(&self, query: &ListQuery) -> Result<PaginatedResponse, ClientError> {
        let url = self.config.endpoint("submissions");
        let request = self.client.get(&url).query(&query.query_pairs());
        self.read(request, &url, "submissions").await
    }

    async fn delete_record(&self, id: &str) -> Result<Value, ClientError> {
        let url = self.record_url(id)?;
        self.mutate(self.client.delete(&url), &url).await
    }
}
