//! # Error Types
//!
//! Structural errors raised while loading descriptors or decoding
//! candidate values. Validation failures are never errors: the engine
//! reports them as per-field messages.

use thiserror::Error;

/// A form descriptor that cannot be used as served.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// A `regex` constraint does not compile.
    #[error("field '{field}' has an invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Id of the field carrying the pattern.
        field: String,
        /// The pattern as served.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// A `minDate` constraint is not a calendar date.
    #[error("field '{field}' has an invalid minDate '{value}'")]
    InvalidMinDate {
        /// Id of the field carrying the bound.
        field: String,
        /// The bound as served.
        value: String,
    },

    /// Two fields in one schema share an id.
    #[error("duplicate field id '{field}'")]
    DuplicateFieldId {
        /// The repeated id.
        field: String,
    },
}

/// A JSON value that has no [`FieldValue`](crate::FieldValue) shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueShapeError {
    /// Objects are never field values.
    #[error("objects are not valid field values")]
    Object,

    /// Sequences hold scalars only.
    #[error("sequence element at index {index} is not a scalar")]
    NestedElement {
        /// Position of the offending element.
        index: usize,
    },
}
