//! # Candidate Values
//!
//! The in-progress value of one field. Values are untyped at the wire
//! boundary; [`FieldValue`] gives them a closed shape so the engine can
//! match on `(FieldType, FieldValue)` pairs.
//!
//! ## Emptiness
//!
//! Two distinct notions are used by validation and must stay distinct:
//!
//! - [`FieldValue::is_blank`]: absent or the empty string. An optional
//!   blank field skips every other check.
//! - [`FieldValue::is_falsy`]: blank, `false`, or zero. A required
//!   switch that is falsy counts as missing.
//!
//! An empty sequence is neither blank nor falsy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValueShapeError;

/// Current values of a form, keyed by field id.
pub type FieldValues = BTreeMap<String, FieldValue>;

/// Current error messages of a form, keyed by field id. A missing key
/// means the field is valid.
pub type FieldErrors = BTreeMap<String, String>;

/// One field's candidate value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum FieldValue {
    /// Never set, or explicitly `null`.
    #[default]
    Absent,
    /// A string, as typed or chosen.
    Text(String),
    /// A number.
    Number(f64),
    /// A toggle state.
    Bool(bool),
    /// An ordered selection.
    Sequence(Vec<String>),
}

impl FieldValue {
    /// Absent or the empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Blank, `false`, zero, or not-a-number.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Bool(b) => !b,
            Self::Number(n) => *n == 0.0 || n.is_nan(),
            Self::Sequence(_) => false,
            other => other.is_blank(),
        }
    }

    /// The selection, if this value is a sequence.
    pub fn as_sequence(&self) -> Option<&[String]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// String form used by text validation. Sequences join with `,`.
    pub fn to_text(&self) -> String {
        match self {
            Self::Absent => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => b.to_string(),
            Self::Sequence(items) => items.join(","),
        }
    }

    /// Human rendering for record views. Sequences join with `, `.
    pub fn display(&self) -> String {
        match self {
            Self::Sequence(items) => items.join(", "),
            other => other.to_text(),
        }
    }
}

/// Shortest decimal rendering of a number: `10`, `2.5`, `-3`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Normalizes negative zero.
        return "0".to_string();
    }
    format!("{n}")
}

impl TryFrom<Value> for FieldValue {
    type Error = ValueShapeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::Absent),
            Value::String(s) => Ok(Self::Text(s)),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Number(n) => Ok(Self::Number(n.as_f64().unwrap_or(f64::NAN))),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::String(s) => Ok(s),
                    Value::Number(n) => Ok(format_number(n.as_f64().unwrap_or(f64::NAN))),
                    Value::Bool(b) => Ok(b.to_string()),
                    _ => Err(ValueShapeError::NestedElement { index }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Sequence),
            Value::Object(_) => Err(ValueShapeError::Object),
        }
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Absent => Value::Null,
            FieldValue::Text(s) => Value::String(s),
            FieldValue::Bool(b) => Value::Bool(b),
            FieldValue::Number(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Sequence(items) => {
                Value::Array(items.into_iter().map(Value::String).collect())
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::Sequence(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        Self::Sequence(items.into_iter().map(str::to_string).collect())
    }
}
