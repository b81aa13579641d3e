//! Observability for the registration form
//!
//! Structured JSON logging of form lifecycle events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. Logging never fails the caller
//! 3. Synchronous, no background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use regform::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::Submitted, &[("city", "Ponyville")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
