use serde::Serialize;

use super::input::{ParsedCount, ParsedField};

/// One violated constraint, keyed by the camelCase field identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Collects every violation in field order; nothing short-circuits.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: &'static str, message: String) {
        self.errors.push(FieldError { field, message });
    }

    /// Required amount that must be strictly positive.
    pub fn require_positive(
        &mut self,
        field: &'static str,
        label: &str,
        value: ParsedField,
    ) -> f64 {
        match value {
            ParsedField::Number(v) if v > 0.0 => v,
            _ => {
                self.push(field, format!("{label} must be a number greater than 0"));
                0.0
            }
        }
    }

    /// Optional amount; blank or unparseable text takes `default`.
    pub fn require_non_negative(
        &mut self,
        field: &'static str,
        label: &str,
        value: ParsedField,
        default: f64,
    ) -> f64 {
        let v = value.or_default(default);
        if v < 0.0 {
            self.push(field, format!("{label} cannot be negative"));
            return 0.0;
        }
        v
    }

    /// Required percentage within the inclusive range [0, 100].
    pub fn require_percentage(
        &mut self,
        field: &'static str,
        label: &str,
        value: ParsedField,
    ) -> f64 {
        match value {
            ParsedField::Number(v) if (0.0..=100.0).contains(&v) => v,
            _ => {
                self.push(field, format!("{label} must be between 0 and 100"));
                0.0
            }
        }
    }

    /// Required whole count greater than zero.
    pub fn require_positive_count(
        &mut self,
        field: &'static str,
        label: &str,
        value: ParsedCount,
    ) -> u64 {
        match value {
            ParsedCount::Count(v) if v > 0 => v.unsigned_abs(),
            _ => {
                self.push(field, format!("{label} must be a whole number greater than 0"));
                0
            }
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Vec<FieldError> {
        self.errors
    }
}
