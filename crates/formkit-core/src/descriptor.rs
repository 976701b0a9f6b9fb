//! # Field Descriptors
//!
//! The schema a server serves to describe one form: its fields, their
//! types, labels, and constraint sets.
//!
//! ## Wire Format
//!
//! ```json
//! {
//!   "title": "Employee Onboarding",
//!   "description": "...",
//!   "fields": [
//!     { "id": "fullName", "type": "text", "label": "Full Name",
//!       "required": true, "validation": { "minLength": 2, "maxLength": 80 } },
//!     { "id": "skills", "type": "multi-select", "label": "Skills",
//!       "options": ["Rust", "Go"], "validation": { "minSelected": 1 } }
//!   ]
//! }
//! ```
//!
//! ## Rule Applicability
//!
//! A [`ValidationRule`] is sparse and shared across types. Each attribute
//! is consulted only for the [`FieldType`] it targets; `min` on a text
//! field or `minLength` on a number field is inert, never an error.

use serde::{Deserialize, Deserializer, Serialize};

// ─── Field Type ──────────────────────────────────────────────────────

/// The closed set of input kinds a schema may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    /// Single-line free text.
    Text,
    /// Numeric input; may arrive as a string and is coerced.
    Number,
    /// One choice from `options`.
    Select,
    /// Any number of choices from `options`.
    MultiSelect,
    /// Calendar date, ISO formatted.
    Date,
    /// Multi-line free text.
    Textarea,
    /// On/off toggle; a required switch must be on.
    Switch,
    /// Checkbox.
    Checkbox,
}

impl FieldType {
    /// Whether values of this type are validated as text.
    pub fn is_text_like(&self) -> bool {
        matches!(self, Self::Text | Self::Textarea)
    }

    /// The wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Select => "select",
            Self::MultiSelect => "multi-select",
            Self::Date => "date",
            Self::Textarea => "textarea",
            Self::Switch => "switch",
            Self::Checkbox => "checkbox",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Validation Rule ─────────────────────────────────────────────────

/// Optional constraints attached to a field.
///
/// All attributes are independent. Zero-valued bounds are inert.
///
/// Count bounds (`minLength`, `maxLength`, `minSelected`, `maxSelected`)
/// accept any JSON number: zero, negative, and non-finite values read as
/// unset, and fractions round to the count they enforce (up for a
/// minimum, down for a maximum).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    /// Minimum string length (text, textarea).
    #[serde(
        default,
        deserialize_with = "lower_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_length: Option<usize>,
    /// Maximum string length (text, textarea).
    #[serde(
        default,
        deserialize_with = "upper_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_length: Option<usize>,
    /// Pattern the whole string must match (text, textarea).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    /// Inclusive numeric lower bound (number).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive numeric upper bound (number).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Inclusive lower bound, `YYYY-MM-DD` (date).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<String>,
    /// Minimum number of selections (multi-select).
    #[serde(
        default,
        deserialize_with = "lower_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_selected: Option<usize>,
    /// Maximum number of selections (multi-select).
    #[serde(
        default,
        deserialize_with = "upper_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_selected: Option<usize>,
}

impl ValidationRule {
    /// Length bounds for a text field.
    pub fn length(min: Option<usize>, max: Option<usize>) -> Self {
        Self {
            min_length: min,
            max_length: max,
            ..Self::default()
        }
    }

    /// Numeric bounds for a number field.
    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min,
            max,
            ..Self::default()
        }
    }

    /// Full-match pattern for a text field.
    pub fn pattern(regex: impl Into<String>) -> Self {
        Self {
            regex: Some(regex.into()),
            ..Self::default()
        }
    }

    /// Earliest accepted date for a date field.
    pub fn not_before(min_date: impl Into<String>) -> Self {
        Self {
            min_date: Some(min_date.into()),
            ..Self::default()
        }
    }

    /// Selection-count bounds for a multi-select field.
    pub fn selections(min: Option<usize>, max: Option<usize>) -> Self {
        Self {
            min_selected: min,
            max_selected: max,
            ..Self::default()
        }
    }
}

fn lower_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
    count_bound(d, f64::ceil)
}

fn upper_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
    count_bound(d, f64::floor)
}

fn count_bound<'de, D: Deserializer<'de>>(
    d: D,
    round: fn(f64) -> f64,
) -> Result<Option<usize>, D::Error> {
    let raw = Option::<f64>::deserialize(d)?;
    Ok(raw
        .filter(|n| n.is_finite() && *n > 0.0)
        .map(|n| round(n) as usize)
        .filter(|n| *n > 0))
}

// ─── Field Descriptor ────────────────────────────────────────────────

/// Server-declared specification of one form input.
///
/// Identity is `id`. Uniqueness across a schema is checked when the
/// schema is compiled, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Stable key used in value and error maps.
    pub id: String,
    /// Input kind.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Human label; prefixes every error message.
    pub label: String,
    /// Placeholder hint for the rendered input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Whether an empty value is rejected.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Choice universe for select and multi-select, in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Constraint set, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRule>,
}

impl FieldDescriptor {
    /// An optional field with no constraints.
    pub fn new(id: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: label.into(),
            placeholder: None,
            required: false,
            options: None,
            validation: None,
        }
    }

    /// Mark the field required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a constraint set.
    pub fn with_validation(mut self, rule: ValidationRule) -> Self {
        self.validation = Some(rule);
        self
    }

    /// Attach a choice universe.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Attach a placeholder hint.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

// ─── Form Schema ─────────────────────────────────────────────────────

/// A complete form: heading text plus fields in rendering order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    /// Form heading.
    pub title: String,
    /// Explanatory text under the heading.
    pub description: String,
    /// Fields in rendering and validation order.
    pub fields: Vec<FieldDescriptor>,
}

impl FormSchema {
    /// Look up a field by id.
    pub fn field(&self, id: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Field ids in schema order.
    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.id.as_str())
    }
}
