//! Observable form events
//!
//! Events are explicit and typed; the logger only ever sees their names.

use std::fmt;

use super::logger::Severity;

/// Events emitted while a form is edited and submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration file read and validated
    ConfigLoaded,
    /// A draft field was overwritten
    FieldUpdated,
    /// Submit attempted with an invalid draft
    ValidationFailed,
    /// Record handed to the host and persisted
    Submitted,
    /// Host callback or persistence sink failed
    SubmissionFailed,
    /// A user-facing notice was raised
    Notice,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::FieldUpdated => "FORM_FIELD_UPDATED",
            Event::ValidationFailed => "FORM_VALIDATION_FAILED",
            Event::Submitted => "FORM_SUBMITTED",
            Event::SubmissionFailed => "FORM_SUBMISSION_FAILED",
            Event::Notice => "NOTICE",
        }
    }

    /// Default severity for the event
    pub fn severity(&self) -> Severity {
        match self {
            Event::FieldUpdated => Severity::Trace,
            Event::ConfigLoaded | Event::Submitted | Event::Notice => Severity::Info,
            Event::ValidationFailed => Severity::Warn,
            Event::SubmissionFailed => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::FieldUpdated.as_str(), "FORM_FIELD_UPDATED");
        assert_eq!(Event::SubmissionFailed.as_str(), "FORM_SUBMISSION_FAILED");
    }

    #[test]
    fn test_failures_are_not_info() {
        assert_eq!(Event::ValidationFailed.severity(), Severity::Warn);
        assert_eq!(Event::SubmissionFailed.severity(), Severity::Error);
    }
}
