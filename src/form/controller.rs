//! Registration form controller
//!
//! Owns one draft and drives it through the form lifecycle:
//!
//! ```text
//! Editing --submit, valid------------------> Editing (empty draft)
//! Editing --submit, invalid----------------> Editing (draft kept, errors shown)
//! Editing --submit, valid, handler/store err> Editing (draft kept)
//! ```
//!
//! Readiness is a presence check recomputed after every mutation. It gates
//! the submit control only; correctness is decided by the schema at submit
//! time.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::errors::{HandlerError, SubmissionError};
use super::notify::Notifier;
use super::store::{save_record, RegistryStore, DEFAULT_STORAGE_KEY};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{
    Clock, Draft, Field, FieldErrors, RegistrationRecord, RegistrationSchema, SystemClock,
};

/// When field errors are refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationMode {
    /// Re-check a field each time it changes
    #[default]
    OnChange,
    /// Only check at submit
    OnSubmit,
}

/// Result of one submit attempt
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Handed to the host, persisted, draft cleared
    Submitted(RegistrationRecord),
    /// Draft failed validation; draft kept
    Invalid(FieldErrors),
    /// Valid draft, but the host callback or the store failed; draft kept
    Failed(SubmissionError),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted(_))
    }

    pub fn record(&self) -> Option<&RegistrationRecord> {
        match self {
            SubmitOutcome::Submitted(record) => Some(record),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmitOutcome::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

type Handler = Box<dyn FnMut(&RegistrationRecord) -> Result<(), HandlerError>>;

/// A single registration form instance
pub struct RegistrationForm<N: Notifier, S: RegistryStore> {
    schema: RegistrationSchema,
    mode: ValidationMode,
    storage_key: String,
    clock: Box<dyn Clock>,
    handler: Handler,
    notifier: N,
    store: S,

    draft: Draft,
    ready: bool,
    errors: FieldErrors,
}

impl<N: Notifier, S: RegistryStore> RegistrationForm<N, S> {
    /// Creates a form with an empty draft.
    ///
    /// `handler` is the host callback, called with each valid record before
    /// it is persisted.
    pub fn new<H>(handler: H, notifier: N, store: S) -> Self
    where
        H: FnMut(&RegistrationRecord) -> Result<(), HandlerError> + 'static,
    {
        Self {
            schema: RegistrationSchema::new(),
            mode: ValidationMode::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            clock: Box::new(SystemClock),
            handler: Box::new(handler),
            notifier,
            store,
            draft: Draft::new(),
            ready: false,
            errors: FieldErrors::new(),
        }
    }

    pub fn with_schema(mut self, schema: RegistrationSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Overwrites one field from raw input and returns the new readiness.
    pub fn update_field(&mut self, field: Field, value: &str) -> bool {
        self.draft.set(field, value);
        self.after_update(field)
    }

    /// Sets or clears the birth date directly and returns the new readiness.
    pub fn set_birth_date(&mut self, date: Option<NaiveDate>) -> bool {
        self.draft.birth_date = date;
        self.after_update(Field::BirthDate)
    }

    fn after_update(&mut self, field: Field) -> bool {
        if self.mode == ValidationMode::OnChange {
            let today = self.clock.today();
            match self.schema.validate_field(field, &self.draft, today) {
                Some(error) => self.errors.insert(error),
                None => self.errors.remove(field),
            }
        }

        let ready = self.recompute_ready();
        log_event_with_fields(
            Event::FieldUpdated,
            &[("field", field.name()), ("ready", bool_str(ready))],
        );
        ready
    }

    /// Recomputes readiness from the draft
    pub fn recompute_ready(&mut self) -> bool {
        self.ready = self.draft.is_complete();
        self.ready
    }

    /// Whether every field is filled in. Not a validity check.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Current field errors for display
    pub fn field_errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn field_error(&self, field: Field) -> Option<&str> {
        self.errors.message(field)
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Clears the draft, errors and readiness
    pub fn reset(&mut self) {
        self.draft = Draft::new();
        self.errors.clear();
        self.ready = false;
    }

    /// Validates the draft and hands a valid record to the host and the
    /// store.
    ///
    /// Never fails: every outcome is reported through the returned value
    /// and the notifier, including a panic in the host callback. The host
    /// callback runs before the store write, so a failing callback means
    /// nothing is persisted.
    pub fn submit(&mut self) -> SubmitOutcome {
        let today = self.clock.today();
        let record = match self.schema.validate(&self.draft, today) {
            Ok(record) => record,
            Err(errors) => {
                let names: Vec<&str> = errors.iter().map(|e| e.field().name()).collect();
                let names = names.join(",");
                log_event_with_fields(Event::ValidationFailed, &[("fields", names.as_str())]);
                self.errors = errors.clone();
                self.notifier.notify_validation_failed();
                return SubmitOutcome::Invalid(errors);
            }
        };
        self.errors.clear();

        if let Err(err) = self.hand_off(&record) {
            let message = err.to_string();
            log_event_with_fields(
                Event::SubmissionFailed,
                &[("code", err.code()), ("error", message.as_str())],
            );
            self.notifier.notify_submission_failed();
            return SubmitOutcome::Failed(err);
        }

        log_event_with_fields(Event::Submitted, &[("key", self.storage_key.as_str())]);
        self.notifier.notify_success();
        self.reset();
        SubmitOutcome::Submitted(record)
    }

    /// Submit through the gated control: does nothing unless the form is
    /// ready.
    pub fn submit_if_ready(&mut self) -> Option<SubmitOutcome> {
        if !self.ready {
            return None;
        }
        Some(self.submit())
    }

    fn hand_off(&mut self, record: &RegistrationRecord) -> Result<(), SubmissionError> {
        match catch_unwind(AssertUnwindSafe(|| (self.handler)(record))) {
            Ok(result) => result.map_err(SubmissionError::Handler)?,
            Err(payload) => {
                return Err(SubmissionError::HandlerPanicked(panic_message(payload.as_ref())))
            }
        }
        save_record(&mut self.store, &self.storage_key, record)?;
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn bool_str(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::notify::{Notice, RecordingNotifier};
    use crate::form::store::{load_record, MemoryStore};
    use crate::schema::FixedClock;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn form() -> RegistrationForm<RecordingNotifier, MemoryStore> {
        RegistrationForm::new(|_| Ok(()), RecordingNotifier::new(), MemoryStore::new())
            .with_clock(FixedClock(today()))
    }

    fn fill(form: &mut RegistrationForm<RecordingNotifier, MemoryStore>) {
        form.update_field(Field::FirstName, "Twilight");
        form.update_field(Field::LastName, "Sparkle");
        form.update_field(Field::Email, "twilight@ponyville.com");
        form.update_field(Field::BirthDate, "2000-05-01");
        form.update_field(Field::City, "Ponyville");
        form.update_field(Field::PostalCode, "12345");
    }

    #[test]
    fn test_new_form_not_ready() {
        let form = form();
        assert!(!form.is_ready());
        assert!(form.draft().is_empty());
    }

    #[test]
    fn test_ready_after_last_field() {
        let mut form = form();
        assert!(!form.update_field(Field::FirstName, "Twilight"));
        fill(&mut form);
        assert!(form.is_ready());

        assert!(!form.update_field(Field::City, "  "));
    }

    #[test]
    fn test_gated_submit_needs_readiness() {
        let mut form = form();
        form.update_field(Field::FirstName, "Twilight");
        assert!(form.submit_if_ready().is_none());
        assert!(form.notifier().notices().is_empty());

        fill(&mut form);
        assert!(form.submit_if_ready().unwrap().is_submitted());
    }

    #[test]
    fn test_invalid_but_complete_is_ready() {
        let mut form = form();
        fill(&mut form);
        assert!(form.update_field(Field::PostalCode, "42"));
    }

    #[test]
    fn test_submit_success_clears_draft() {
        let mut form = form();
        fill(&mut form);
        let outcome = form.submit();

        assert!(outcome.is_submitted());
        assert!(form.draft().is_empty());
        assert!(!form.is_ready());
        assert_eq!(form.notifier().notices(), &[Notice::Success]);
        let stored = load_record(form.store(), DEFAULT_STORAGE_KEY).unwrap();
        assert_eq!(stored.as_ref(), outcome.record());
    }

    #[test]
    fn test_submit_invalid_keeps_draft() {
        let mut form = form();
        fill(&mut form);
        form.update_field(Field::PostalCode, "42");
        let before = form.draft().clone();

        let outcome = form.submit();
        let errors = outcome.field_errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            form.field_error(Field::PostalCode),
            Some("Postal code must have exactly 5 digits")
        );
        assert_eq!(form.draft(), &before);
        assert_eq!(form.store().writes(), 0);
        assert_eq!(form.notifier().notices(), &[Notice::ValidationFailed]);
    }

    #[test]
    fn test_handler_failure_skips_store() {
        let mut form = RegistrationForm::new(
            |_| Err("Magic flux error".into()),
            RecordingNotifier::new(),
            MemoryStore::new(),
        )
        .with_clock(FixedClock(today()));
        fill(&mut form);
        let before = form.draft().clone();

        let outcome = form.submit();
        assert!(matches!(outcome, SubmitOutcome::Failed(SubmissionError::Handler(_))));
        assert_eq!(form.store().writes(), 0);
        assert_eq!(form.draft(), &before);
        assert!(form.is_ready());
        assert_eq!(form.notifier().notices(), &[Notice::SubmissionFailed]);
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(&"flux"), "flux");
        assert_eq!(panic_message(&String::from("spell")), "spell");
        assert_eq!(panic_message(&42u8), "non-string panic payload");
    }

    #[test]
    fn test_on_change_refreshes_field_error() {
        let mut form = form();
        form.update_field(Field::Email, "partytime");
        assert_eq!(form.field_error(Field::Email), Some("Scroll address is not valid"));
        form.update_field(Field::Email, "pinkie@sugarcube.corner");
        assert_eq!(form.field_error(Field::Email), None);
    }

    #[test]
    fn test_on_submit_mode_defers_errors() {
        let mut form = form().with_mode(ValidationMode::OnSubmit);
        form.update_field(Field::Email, "partytime");
        assert!(form.field_errors().is_empty());
    }

    #[test]
    fn test_custom_storage_key() {
        let mut form = form().with_storage_key("herd");
        fill(&mut form);
        form.submit();
        assert!(load_record(form.store(), "herd").unwrap().is_some());
        assert!(load_record(form.store(), DEFAULT_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_set_birth_date() {
        let mut form = form();
        form.set_birth_date(NaiveDate::from_ymd_opt(2010, 1, 1));
        assert_eq!(
            form.field_error(Field::BirthDate),
            Some("You must be at least 18 moons old to enter")
        );
        form.set_birth_date(None);
        assert_eq!(form.field_error(Field::BirthDate), Some("Invalid date"));
    }
}
