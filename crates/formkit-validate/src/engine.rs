//! # Validation Engine
//!
//! `(FieldDescriptor, FieldValue) -> Option<message>`. Pure and
//! deterministic: no I/O, no hidden state, inputs borrowed.
//!
//! ## Check Order
//!
//! Only the first failing check's message is returned.
//!
//! | Step | Applies to | Fails when | Message |
//! |------|-----------|------------|---------|
//! | 1 | required | blank; non-sequence or empty sequence (multi-select); falsy (switch) | `<label> is required` |
//! | 2 | optional | blank value: stop, valid | |
//! | 3 | any | no rule set: stop, valid | |
//! | 4a | text, textarea | length < `minLength` | `<label> must be at least N characters` |
//! | 4a | text, textarea | length > `maxLength` | `<label> must not exceed N characters` |
//! | 4a | text, textarea | no full match of `regex` | `<label> format is invalid` |
//! | 4b | number | not numeric | `<label> must be a valid number` |
//! | 4b | number | < `min` / > `max` | `<label> must be at least N` / `must not exceed N` |
//! | 4c | date | unparsable | `<label> must be a valid date` |
//! | 4c | date | before `minDate` | `<label> must be on or after <minDate>` |
//! | 4d | multi-select | not a sequence | `<label> must be an array` |
//! | 4d | multi-select | count < `minSelected` / > `maxSelected` | `... at least N selection(s)` / `... not exceed N selection(s)` |
//!
//! Step 1 and step 2 use different emptiness: an optional multi-select
//! holding `[]` is not blank and proceeds to the selection-count checks.

use chrono::NaiveDate;
use regex::Regex;

use formkit_core::{format_number, FieldDescriptor, FieldType, FieldValue, ValidationRule};

use crate::date::parse_calendar_date;

/// Pattern state for a text field's `regex` constraint.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FieldPattern<'a> {
    /// No usable pattern.
    Unset,
    /// Anchored and compiled.
    Compiled(&'a Regex),
    /// Present but does not compile.
    Malformed(&'a str),
}

/// Pre-parsed `minDate` state for a date field.
#[derive(Debug, Clone, Copy)]
pub(crate) enum MinDate<'a> {
    Unset,
    Parsed { date: NaiveDate, literal: &'a str },
}

/// Validate one value against one field descriptor.
///
/// Works on unchecked descriptors. A `regex` that does not compile
/// fails the value with the format message; use
/// [`SchemaValidator`](crate::SchemaValidator) to reject such descriptors
/// at load time instead.
pub fn validate(field: &FieldDescriptor, value: &FieldValue) -> Option<String> {
    let rule = field.validation.as_ref();

    let compiled = rule
        .filter(|_| field.field_type.is_text_like())
        .and_then(|r| non_empty(r.regex.as_deref()))
        .map(|p| (p, compile_full_match(p)));
    let pattern = match &compiled {
        None => FieldPattern::Unset,
        Some((_, Ok(re))) => FieldPattern::Compiled(re),
        Some((p, Err(_))) => FieldPattern::Malformed(*p),
    };

    let min_date = rule
        .filter(|_| field.field_type == FieldType::Date)
        .and_then(|r| non_empty(r.min_date.as_deref()))
        .and_then(|literal| {
            parse_calendar_date(literal).map(|date| MinDate::Parsed { date, literal })
        })
        .unwrap_or(MinDate::Unset);

    evaluate(field, value, pattern, min_date)
}

/// Anchor a pattern so it must match the whole string, then compile it.
pub(crate) fn compile_full_match(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

pub(crate) fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Core check sequence shared by the free function and compiled schemas.
pub(crate) fn evaluate(
    field: &FieldDescriptor,
    value: &FieldValue,
    pattern: FieldPattern<'_>,
    min_date: MinDate<'_>,
) -> Option<String> {
    let label = field.label.as_str();

    if field.required && is_missing(field.field_type, value) {
        return Some(format!("{label} is required"));
    }

    if !field.required && value.is_blank() {
        return None;
    }

    let rule = field.validation.as_ref()?;

    match field.field_type {
        FieldType::Text | FieldType::Textarea => check_text(label, rule, value, pattern),
        FieldType::Number => check_number(label, rule, value),
        FieldType::Date => check_date(label, value, min_date),
        FieldType::MultiSelect => check_selection(label, rule, value),
        FieldType::Select | FieldType::Switch | FieldType::Checkbox => None,
    }
}

/// Step 1 emptiness: blank for every type, plus type-specific cases.
fn is_missing(field_type: FieldType, value: &FieldValue) -> bool {
    if value.is_blank() {
        return true;
    }
    match field_type {
        FieldType::MultiSelect => value.as_sequence().map_or(true, <[String]>::is_empty),
        FieldType::Switch => value.is_falsy(),
        _ => false,
    }
}

fn check_text(
    label: &str,
    rule: &ValidationRule,
    value: &FieldValue,
    pattern: FieldPattern<'_>,
) -> Option<String> {
    let text = value.to_text();
    let length = text.chars().count();

    if let Some(min) = rule.min_length.filter(|n| *n > 0) {
        if length < min {
            return Some(format!("{label} must be at least {min} characters"));
        }
    }

    if let Some(max) = rule.max_length.filter(|n| *n > 0) {
        if length > max {
            return Some(format!("{label} must not exceed {max} characters"));
        }
    }

    match pattern {
        FieldPattern::Unset => None,
        FieldPattern::Compiled(re) if re.is_match(&text) => None,
        FieldPattern::Compiled(_) => Some(format!("{label} format is invalid")),
        FieldPattern::Malformed(p) => {
            tracing::warn!(pattern = p, "field pattern does not compile; rejecting value");
            Some(format!("{label} format is invalid"))
        }
    }
}

fn check_number(label: &str, rule: &ValidationRule, value: &FieldValue) -> Option<String> {
    let Some(n) = coerce_number(value) else {
        return Some(format!("{label} must be a valid number"));
    };

    if let Some(min) = rule.min {
        if n < min {
            return Some(format!("{label} must be at least {}", format_number(min)));
        }
    }

    if let Some(max) = rule.max {
        if n > max {
            return Some(format!("{label} must not exceed {}", format_number(max)));
        }
    }

    None
}

/// Numeric reading of a candidate. Text is trimmed and parsed; booleans
/// and sequences are not numbers.
fn coerce_number(value: &FieldValue) -> Option<f64> {
    let n = match value {
        FieldValue::Number(n) => *n,
        FieldValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        FieldValue::Absent | FieldValue::Bool(_) | FieldValue::Sequence(_) => return None,
    };
    n.is_finite().then_some(n)
}

fn check_date(label: &str, value: &FieldValue, min_date: MinDate<'_>) -> Option<String> {
    let parsed = match value {
        FieldValue::Text(s) => parse_calendar_date(s),
        _ => None,
    };
    let Some(date) = parsed else {
        return Some(format!("{label} must be a valid date"));
    };

    match min_date {
        MinDate::Parsed { date: min, literal } if date < min => {
            Some(format!("{label} must be on or after {literal}"))
        }
        _ => None,
    }
}

fn check_selection(label: &str, rule: &ValidationRule, value: &FieldValue) -> Option<String> {
    let Some(items) = value.as_sequence() else {
        return Some(format!("{label} must be an array"));
    };

    if let Some(min) = rule.min_selected.filter(|n| *n > 0) {
        if items.len() < min {
            return Some(format!("{label} must have at least {min} selection(s)"));
        }
    }

    if let Some(max) = rule.max_selected.filter(|n| *n > 0) {
        if items.len() > max {
            return Some(format!("{label} must not exceed {max} selection(s)"));
        }
    }

    None
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_type() -> impl Strategy<Value = FieldType> {
        prop_oneof![
            Just(FieldType::Text),
            Just(FieldType::Number),
            Just(FieldType::Select),
            Just(FieldType::MultiSelect),
            Just(FieldType::Date),
            Just(FieldType::Textarea),
            Just(FieldType::Switch),
            Just(FieldType::Checkbox),
        ]
    }

    fn any_rule() -> impl Strategy<Value = ValidationRule> {
        (
            proptest::option::of(0usize..10),
            proptest::option::of(0usize..10),
            proptest::option::of(-50.0f64..50.0),
            proptest::option::of(-50.0f64..50.0),
            proptest::option::of(0usize..4),
            proptest::option::of(0usize..4),
        )
            .prop_map(|(min_length, max_length, min, max, min_selected, max_selected)| {
                ValidationRule {
                    min_length,
                    max_length,
                    regex: None,
                    min,
                    max,
                    min_date: Some("2024-01-01".into()),
                    min_selected,
                    max_selected,
                }
            })
    }

    fn any_value() -> impl Strategy<Value = FieldValue> {
        prop_oneof![
            Just(FieldValue::Absent),
            "[a-z0-9 -]{0,12}".prop_map(FieldValue::Text),
            (-100.0f64..100.0).prop_map(FieldValue::Number),
            any::<bool>().prop_map(FieldValue::Bool),
            proptest::collection::vec("[a-c]", 0..5).prop_map(FieldValue::Sequence),
        ]
    }

    proptest! {
        /// Repeated evaluation of the same pair yields the same result.
        #[test]
        fn validation_is_idempotent(t in any_type(), rule in any_rule(), required in any::<bool>(), v in any_value()) {
            let mut field = FieldDescriptor::new("f", t, "F").with_validation(rule);
            field.required = required;
            let first = validate(&field, &v);
            prop_assert_eq!(&first, &validate(&field, &v));
            prop_assert_eq!(&first, &validate(&field, &v));
        }

        /// An optional blank value always passes, whatever the rules.
        #[test]
        fn optional_blank_always_passes(t in any_type(), rule in any_rule(), blank in prop_oneof![Just(FieldValue::Absent), Just(FieldValue::from(""))]) {
            let field = FieldDescriptor::new("f", t, "F").with_validation(rule);
            prop_assert_eq!(validate(&field, &blank), None);
        }

        /// A required blank value always fails with the required message.
        #[test]
        fn required_blank_always_fails_first(t in any_type(), rule in any_rule(), blank in prop_oneof![Just(FieldValue::Absent), Just(FieldValue::from(""))]) {
            let field = FieldDescriptor::new("f", t, "F").required().with_validation(rule);
            prop_assert_eq!(validate(&field, &blank), Some("F is required".to_string()));
        }

        /// Every message is prefixed by the field label.
        #[test]
        fn messages_start_with_label(t in any_type(), rule in any_rule(), required in any::<bool>(), v in any_value()) {
            let mut field = FieldDescriptor::new("f", t, "Some Label").with_validation(rule);
            field.required = required;
            if let Some(message) = validate(&field, &v) {
                prop_assert!(message.starts_with("Some Label "));
            }
        }
    }
}
