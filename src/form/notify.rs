//! # Notifications
//!
//! One-way channel for the three user-facing notices a form raises.
//! The form never reads anything back from it.

use std::fmt;

use crate::observability::{Event, Logger};

/// How a notice should be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

/// The fixed notices a form can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Submit attempted with field errors
    ValidationFailed,
    /// Valid record, but the handler or the store failed
    SubmissionFailed,
    /// Record handed off and persisted
    Success,
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::ValidationFailed => NoticeLevel::Warning,
            Notice::SubmissionFailed => NoticeLevel::Error,
            Notice::Success => NoticeLevel::Success,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Notice::ValidationFailed => {
                "⚠️ Please fix the scroll before sending it to Princess Celestia!"
            }
            Notice::SubmissionFailed => "💥 Oh no! There’s a hiccup in your spell...",
            Notice::Success => "✨ You've been registered in Equestria!",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level().as_str(), self.message())
    }
}

/// Receiver for form notices
pub trait Notifier {
    /// Deliver a notice. Must not fail.
    fn notify(&mut self, notice: Notice);

    fn notify_validation_failed(&mut self) {
        self.notify(Notice::ValidationFailed);
    }

    fn notify_submission_failed(&mut self) {
        self.notify(Notice::SubmissionFailed);
    }

    fn notify_success(&mut self) {
        self.notify(Notice::Success);
    }
}

/// Keeps every notice in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Vec<Notice>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices in the order they were raised
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn count(&self, notice: Notice) -> usize {
        self.notices.iter().filter(|n| **n == notice).count()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.last().copied()
    }

    pub fn clear(&mut self) {
        self.notices.clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

/// Emits each notice as a structured log line
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl LogNotifier {
    /// Fields logged with each notice
    pub fn fields(notice: Notice) -> [(&'static str, &'static str); 2] {
        [
            ("level", notice.level().as_str()),
            ("message", notice.message()),
        ]
    }
}

impl Notifier for LogNotifier {
    fn notify(&mut self, notice: Notice) {
        let event = Event::Notice.as_str();
        let fields = Self::fields(notice);
        match notice.level() {
            NoticeLevel::Success => Logger::info(event, &fields),
            NoticeLevel::Warning => Logger::warn(event, &fields),
            NoticeLevel::Error => Logger::error(event, &fields),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::Severity;

    #[test]
    fn test_notice_levels() {
        assert_eq!(Notice::ValidationFailed.level(), NoticeLevel::Warning);
        assert_eq!(Notice::SubmissionFailed.level(), NoticeLevel::Error);
        assert_eq!(Notice::Success.level(), NoticeLevel::Success);
    }

    #[test]
    fn test_recording_notifier_keeps_order() {
        let mut notifier = RecordingNotifier::new();
        notifier.notify_validation_failed();
        notifier.notify_success();
        assert_eq!(notifier.notices(), &[Notice::ValidationFailed, Notice::Success]);
        assert_eq!(notifier.count(Notice::Success), 1);
        assert_eq!(notifier.last(), Some(Notice::Success));

        notifier.clear();
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn test_log_notifier_line() {
        let fields = LogNotifier::fields(Notice::SubmissionFailed);
        let line = Logger::render(Severity::Error, Event::Notice.as_str(), &fields);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "NOTICE");
        assert_eq!(parsed["level"], "error");
        assert_eq!(parsed["message"], "💥 Oh no! There’s a hiccup in your spell...");

        let fields = LogNotifier::fields(Notice::Success);
        assert_eq!(fields[0], ("level", "success"));
        assert_eq!(fields[1].1, Notice::Success.message());
    }
}
