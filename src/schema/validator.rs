//! Registration schema
//!
//! Validation semantics:
//! - Every field is checked, independently of the others
//! - Within a field, rules run in order and the first failure wins
//! - Failures come back as data, never as a panic
//! - A record is produced only when all six fields pass
//!
//! The schema does no I/O and does not read the clock itself; the caller
//! passes `today`.

use chrono::NaiveDate;

use super::errors::{FieldError, FieldErrors};
use super::rules::{check_field, checked_birth_date, RuleContext, SchemaOptions};
use super::types::{Draft, Field, RegistrationRecord};

/// Validates drafts into registration records.
#[derive(Debug, Clone, Default)]
pub struct RegistrationSchema {
    options: SchemaOptions,
}

impl RegistrationSchema {
    /// Creates a schema with the default rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schema with explicit options.
    pub fn with_options(options: SchemaOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SchemaOptions {
        &self.options
    }

    /// Validates a whole draft.
    ///
    /// # Errors
    ///
    /// Returns `FieldErrors` holding one message per failing field, in field
    /// order.
    pub fn validate(&self, draft: &Draft, today: NaiveDate) -> Result<RegistrationRecord, FieldErrors> {
        let mut errors = FieldErrors::new();
        for field in Field::ALL {
            if field == Field::BirthDate {
                continue;
            }
            if let Some(error) = self.validate_field(field, draft, today) {
                errors.insert(error);
            }
        }

        match checked_birth_date(&self.context(Field::BirthDate, today), draft) {
            Ok(birth_date) if errors.is_empty() => Ok(RegistrationRecord {
                first_name: draft.first_name.clone(),
                last_name: draft.last_name.clone(),
                email: draft.email.clone(),
                birth_date,
                city: draft.city.clone(),
                postal_code: draft.postal_code.clone(),
            }),
            Ok(_) => Err(errors),
            Err(error) => {
                errors.insert(error);
                Err(errors)
            }
        }
    }

    /// Validates a single field, returning its first violation.
    pub fn validate_field(&self, field: Field, draft: &Draft, today: NaiveDate) -> Option<FieldError> {
        check_field(&self.context(field, today), draft)
    }

    fn context(&self, field: Field, today: NaiveDate) -> RuleContext<'_> {
        RuleContext {
            field,
            options: &self.options,
            today,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RuleViolation;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn valid_draft() -> Draft {
        let mut draft = Draft::new();
        draft.set(Field::FirstName, "Twilight");
        draft.set(Field::LastName, "Sparkle");
        draft.set(Field::Email, "twilight@ponyville.com");
        draft.set(Field::BirthDate, "2000-05-01");
        draft.set(Field::City, "Ponyville");
        draft.set(Field::PostalCode, "12345");
        draft
    }

    #[test]
    fn test_valid_draft_produces_record() {
        let record = RegistrationSchema::new()
            .validate(&valid_draft(), today())
            .unwrap();
        assert_eq!(record.first_name, "Twilight");
        assert_eq!(record.birth_date, NaiveDate::from_ymd_opt(2000, 5, 1).unwrap());
        assert_eq!(record.postal_code, "12345");
    }

    #[test]
    fn test_empty_draft_fails_every_field() {
        let errors = RegistrationSchema::new()
            .validate(&Draft::new(), today())
            .unwrap_err();
        assert_eq!(errors.len(), 6);
        assert_eq!(
            errors.message(Field::FirstName),
            Some("First name must have at least 2 characters")
        );
        assert_eq!(errors.message(Field::Email), Some("Scroll address is not valid"));
        assert_eq!(errors.message(Field::BirthDate), Some("Invalid date"));
        assert_eq!(
            errors.message(Field::PostalCode),
            Some("Postal code must have exactly 5 digits")
        );
    }

    #[test]
    fn test_only_failing_fields_reported() {
        let mut draft = valid_draft();
        draft.set(Field::PostalCode, "42");
        let errors = RegistrationSchema::new().validate(&draft, today()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(Field::PostalCode).unwrap().violation(),
            RuleViolation::InvalidPostalCode
        );
    }

    #[test]
    fn test_one_message_per_field() {
        let mut draft = valid_draft();
        draft.set(Field::FirstName, "7");
        let errors = RegistrationSchema::new().validate(&draft, today()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(Field::FirstName).unwrap().violation(),
            RuleViolation::TooShort
        );
    }

    #[test]
    fn test_birth_date_error_kept_in_field_order() {
        let mut draft = valid_draft();
        draft.set(Field::FirstName, "");
        draft.set(Field::BirthDate, "");
        draft.set(Field::City, "");
        let errors = RegistrationSchema::new().validate(&draft, today()).unwrap_err();
        let fields: Vec<Field> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec![Field::FirstName, Field::BirthDate, Field::City]);
        assert_eq!(errors.message(Field::BirthDate), Some("Invalid date"));
    }

    #[test]
    fn test_messages_follow_options() {
        let schema = RegistrationSchema::with_options(SchemaOptions {
            min_text_length: 3,
            minimum_age: 21,
            trim_before_length_check: false,
        });
        let mut draft = valid_draft();
        draft.set(Field::City, "Po");
        draft.set(Field::BirthDate, "2004-01-01");
        let errors = schema.validate(&draft, today()).unwrap_err();
        assert_eq!(errors.message(Field::City), Some("City must have at least 3 characters"));
        assert_eq!(
            errors.message(Field::BirthDate),
            Some("You must be at least 21 moons old to enter")
        );
    }

    #[test]
    fn test_validation_is_deterministic() {
        let schema = RegistrationSchema::new();
        let draft = valid_draft();
        let first = schema.validate(&draft, today());
        for _ in 0..10 {
            assert_eq!(schema.validate(&draft, today()), first);
        }
    }
}
