//! The transport contract.
//!
//! A form session only needs these five operations. Implementations
//! must perform exactly one request per call.

use std::future::Future;

use formkit_core::{FieldValues, FormSchema, ListQuery, PaginatedResponse};
use serde_json::Value;

use crate::error::ClientError;

/// Operations consumed from a form server.
pub trait FormTransport {
    /// Fetch the form schema.
    fn fetch_schema(&self) -> impl Future<Output = Result<FormSchema, ClientError>> + Send;

    /// Store a new record. Returns the server's success payload.
    fn submit(
        &self,
        values: &FieldValues,
    ) -> impl Future<Output = Result<Value, ClientError>> + Send;

    /// Replace the values of an existing record.
    fn update_record(
        &self,
        id: &str,
        values: &FieldValues,
    ) -> impl Future<Output = Result<Value, ClientError>> + Send;

    /// Fetch one page of records.
    fn list(
        &self,
        query: &ListQuery,
    ) -> impl Future<Output = Result<PaginatedResponse, ClientError>> + Send;

    /// Delete a record.
    fn delete_record(&self, id: &str) -> impl Future<Output = Result<Value, ClientError>> + Send;
}
