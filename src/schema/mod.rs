//! Validation schema for registration drafts
//!
//! # Design Principles
//!
//! - A `RegistrationRecord` exists only after all six fields pass
//! - One message per failing field, first violated rule wins
//! - Pure: no I/O, no clock access, no panics on user input
//! - Deterministic for a given draft and date

mod clock;
mod errors;
mod rules;
mod types;
mod validator;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{FieldError, FieldErrors, RuleViolation};
pub use rules::{age_cutoff, is_email_shaped, SchemaOptions};
pub use types::{Draft, Field, RegistrationRecord, UnknownField, DATE_FORMAT};
pub use validator::RegistrationSchema;
