//! # Compiled Schemas
//!
//! A [`SchemaValidator`] owns one [`FormSchema`] with every constraint
//! that needs parsing already parsed. Construction is the single point
//! where a malformed descriptor is reported:
//!
//! - a `regex` on a text or textarea field that does not compile,
//! - a `minDate` on a date field that is not a calendar date,
//! - two fields sharing an id.
//!
//! Constraints on fields of another type are never inspected, so a
//! stray `regex` on a number field does not block loading.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use regex::Regex;

use formkit_core::{
    DescriptorError, FieldDescriptor, FieldErrors, FieldType, FieldValue, FieldValues, FormSchema,
};

use crate::date::parse_calendar_date;
use crate::engine::{compile_full_match, evaluate, non_empty, FieldPattern, MinDate};

/// A form schema with its constraints compiled.
///
/// Cheap to clone: compiled patterns share their automata.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: FormSchema,
    patterns: HashMap<String, Regex>,
    min_dates: HashMap<String, NaiveDate>,
}

impl SchemaValidator {
    /// Compile a schema.
    ///
    /// # Errors
    ///
    /// Returns the first [`DescriptorError`] found, in field order.
    pub fn new(schema: FormSchema) -> Result<Self, DescriptorError> {
        let mut seen = HashSet::new();
        let mut patterns = HashMap::new();
        let mut min_dates = HashMap::new();

        for field in &schema.fields {
            if !seen.insert(field.id.as_str()) {
                return Err(DescriptorError::DuplicateFieldId {
                    field: field.id.clone(),
                });
            }
            let Some(rule) = field.validation.as_ref() else {
                continue;
            };

            if field.field_type.is_text_like() {
                if let Some(pattern) = non_empty(rule.regex.as_deref()) {
                    let compiled = compile_full_match(pattern).map_err(|e| {
                        DescriptorError::InvalidPattern {
                            field: field.id.clone(),
                            pattern: pattern.to_string(),
                            reason: e.to_string(),
                        }
                    })?;
                    patterns.insert(field.id.clone(), compiled);
                }
            }

            if field.field_type == FieldType::Date {
                if let Some(literal) = non_empty(rule.min_date.as_deref()) {
                    let date = parse_calendar_date(literal).ok_or_else(|| {
                        DescriptorError::InvalidMinDate {
                            field: field.id.clone(),
                            value: literal.to_string(),
                        }
                    })?;
                    min_dates.insert(field.id.clone(), date);
                }
            }
        }

        tracing::debug!(
            title = %schema.title,
            fields = schema.fields.len(),
            patterns = patterns.len(),
            "compiled form schema"
        );

        Ok(Self {
            schema,
            patterns,
            min_dates,
        })
    }

    /// The schema as served.
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Look up a field descriptor by id.
    pub fn field(&self, id: &str) -> Option<&FieldDescriptor> {
        self.schema.field(id)
    }

    /// Validate one field's value. Unknown ids have no constraints.
    pub fn validate_field(&self, id: &str, value: &FieldValue) -> Option<String> {
        let field = self.schema.field(id)?;
        self.check(field, value)
    }

    /// Validate every schema field against a value map, in schema order.
    ///
    /// Missing entries are treated as absent. Entries with no matching
    /// field are ignored. Only failing fields appear in the result.
    pub fn validate_all(&self, values: &FieldValues) -> FieldErrors {
        let absent = FieldValue::Absent;
        self.schema
            .fields
            .iter()
            .filter_map(|field| {
                let value = values.get(&field.id).unwrap_or(&absent);
                self.check(field, value).map(|message| (field.id.clone(), message))
            })
            .collect()
    }

    fn check(&self, field: &FieldDescriptor, value: &FieldValue) -> Option<String> {
        let pattern = self
            .patterns
            .get(&field.id)
            .map_or(FieldPattern::Unset, FieldPattern::Compiled);

        let min_date = match (self.min_dates.get(&field.id), field.validation.as_ref()) {
            (Some(date), Some(rule)) => MinDate::Parsed {
                date: *date,
                literal: rule.min_date.as_deref().unwrap_or_default(),
            },
            _ => MinDate::Unset,
        };

        evaluate(field, value, pattern, min_date)
    }
}
