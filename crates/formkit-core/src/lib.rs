//! # formkit-core — Field Descriptor Vocabulary
//!
//! The leaf crate of the workspace. It defines the closed vocabulary a
//! server uses to describe a form and the value shapes a client sends
//! back. Every other `formkit-*` crate depends on it; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed field types.** [`FieldType`] is a single enum with eight
//!    variants. Adding a type forces every `match` in the engine to
//!    handle it.
//!
//! 2. **Candidate values are a sum type.** [`FieldValue`] covers absent,
//!    text, number, boolean, and sequence shapes. A sequence handed to a
//!    number field is a representable branch, not a silent coercion.
//!
//! 3. **Descriptors are immutable data.** Nothing here validates values;
//!    that lives in `formkit-validate`. Descriptor structure problems
//!    (duplicate ids, malformed bounds) are reported as
//!    [`DescriptorError`] by the loader that compiles a schema.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `formkit-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod descriptor;
pub mod error;
pub mod record;
pub mod value;

pub use descriptor::{FieldDescriptor, FieldType, FormSchema, ValidationRule};
pub use error::{DescriptorError, ValueShapeError};
pub use record::{ApiErrorBody, ListQuery, PaginatedResponse, Pagination, SortOrder, Submission};
pub use value::{format_number, FieldErrors, FieldValue, FieldValues};
