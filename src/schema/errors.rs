//! Validation error types
//!
//! Rule codes:
//! - REG_TOO_SHORT
//! - REG_INVALID_CHARACTERS
//! - REG_INVALID_EMAIL
//! - REG_MISSING_DATE
//! - REG_UNDERAGE
//! - REG_INVALID_POSTAL_CODE
//!
//! Validation failures are never fatal: the form stays editable.

use std::collections::BTreeMap;
use std::fmt;

use super::types::Field;

/// Which rule a field value broke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleViolation {
    /// Shorter than the minimum length
    TooShort,
    /// Characters outside the name alphabet
    InvalidCharacters,
    /// Not shaped like an email address
    InvalidEmail,
    /// Birth date not set
    MissingDate,
    /// Younger than the minimum age
    Underage,
    /// Not exactly five digits
    InvalidPostalCode,
}

impl RuleViolation {
    /// Returns the stable rule code
    pub fn code(&self) -> &'static str {
        match self {
            RuleViolation::TooShort => "REG_TOO_SHORT",
            RuleViolation::InvalidCharacters => "REG_INVALID_CHARACTERS",
            RuleViolation::InvalidEmail => "REG_INVALID_EMAIL",
            RuleViolation::MissingDate => "REG_MISSING_DATE",
            RuleViolation::Underage => "REG_UNDERAGE",
            RuleViolation::InvalidPostalCode => "REG_INVALID_POSTAL_CODE",
        }
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single failing field and the message to show beside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: Field,
    violation: RuleViolation,
    message: String,
}

impl FieldError {
    pub fn new(field: Field, violation: RuleViolation, message: impl Into<String>) -> Self {
        Self {
            field,
            violation,
            message: message.into(),
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn violation(&self) -> RuleViolation {
        self.violation
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': {} ({})", self.field, self.message, self.violation)
    }
}

/// Per-field validation failures, at most one per field, kept in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error, replacing any earlier one for the same field.
    pub fn insert(&mut self, error: FieldError) {
        self.remove(error.field);
        let pos = self
            .errors
            .iter()
            .position(|e| e.field > error.field)
            .unwrap_or(self.errors.len());
        self.errors.insert(pos, error);
    }

    /// Drops the error for a field, if any
    pub fn remove(&mut self, field: Field) {
        self.errors.retain(|e| e.field != field);
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Returns the error for a field
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// Returns the message for a field
    pub fn message(&self, field: Field) -> Option<&str> {
        self.get(field).map(FieldError::message)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Field name to message, as the presentation layer consumes it
    pub fn to_map(&self) -> BTreeMap<&'static str, String> {
        self.errors
            .iter()
            .map(|e| (e.field.name(), e.message.clone()))
            .collect()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field(s) failed validation", self.errors.len())?;
        for error in &self.errors {
            write!(f, "; {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_codes() {
        assert_eq!(RuleViolation::TooShort.code(), "REG_TOO_SHORT");
        assert_eq!(RuleViolation::InvalidCharacters.code(), "REG_INVALID_CHARACTERS");
        assert_eq!(RuleViolation::InvalidEmail.code(), "REG_INVALID_EMAIL");
        assert_eq!(RuleViolation::MissingDate.code(), "REG_MISSING_DATE");
        assert_eq!(RuleViolation::Underage.code(), "REG_UNDERAGE");
        assert_eq!(RuleViolation::InvalidPostalCode.code(), "REG_INVALID_POSTAL_CODE");
    }

    #[test]
    fn test_errors_kept_in_field_order() {
        let mut errors = FieldErrors::new();
        errors.insert(FieldError::new(Field::PostalCode, RuleViolation::InvalidPostalCode, "pc"));
        errors.insert(FieldError::new(Field::FirstName, RuleViolation::TooShort, "fn"));
        errors.insert(FieldError::new(Field::Email, RuleViolation::InvalidEmail, "em"));

        let order: Vec<Field> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(order, vec![Field::FirstName, Field::Email, Field::PostalCode]);
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut errors = FieldErrors::new();
        errors.insert(FieldError::new(Field::City, RuleViolation::TooShort, "short"));
        errors.insert(FieldError::new(Field::City, RuleViolation::InvalidCharacters, "chars"));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.message(Field::City), Some("chars"));
    }

    #[test]
    fn test_display_names_fields() {
        let mut errors = FieldErrors::new();
        errors.insert(FieldError::new(Field::Email, RuleViolation::InvalidEmail, "bad"));
        let display = errors.to_string();
        assert!(display.contains("email"));
        assert!(display.contains("REG_INVALID_EMAIL"));
    }
}
