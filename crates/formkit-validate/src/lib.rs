//! # formkit-validate — Field Validation Engine
//!
//! Decides whether a candidate value is acceptable for a field and, if
//! not, produces the one message a user sees for it.
//!
//! ## Engine (`engine`)
//!
//! [`validate`] is a pure function of `(descriptor, value)`. Checks run
//! in a fixed order and the first failure wins:
//!
//! 1. required (type-aware emptiness)
//! 2. optional-and-blank short-circuit
//! 3. no rule set attached
//! 4. type-specific checks for the field's own type
//!
//! ## Schema Compilation (`schema`)
//!
//! [`SchemaValidator`] compiles a whole [`FormSchema`](formkit_core::FormSchema)
//! once: patterns are anchored and compiled, `minDate` bounds parsed, and
//! duplicate ids rejected. A schema that loads cannot fail later on a
//! malformed descriptor.
//!
//! ## Crate Policy
//!
//! - Validation never returns `Err` and never panics on a candidate value.
//! - Inputs are borrowed and never mutated.

pub mod date;
pub mod engine;
pub mod schema;

pub use date::parse_calendar_date;
pub use engine::validate;
pub use schema::SchemaValidator;
