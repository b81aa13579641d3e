//! Registration field and record types
//!
//! - `Field`: the six form fields, in display order
//! - `Draft`: unvalidated values held while the user edits
//! - `RegistrationRecord`: the only typed output of the schema

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Date format accepted for the birth date input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Registration form fields in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    BirthDate,
    City,
    PostalCode,
}

impl Field {
    /// All fields, in the order they are validated and displayed.
    pub const ALL: [Field; 6] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::BirthDate,
        Field::City,
        Field::PostalCode,
    ];

    /// Returns the wire name used in JSON documents and error maps
    pub fn name(&self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::BirthDate => "birthDate",
            Field::City => "city",
            Field::PostalCode => "postalCode",
        }
    }

    /// Returns the label shown next to the input
    pub fn label(&self) -> &'static str {
        match self {
            Field::FirstName => "Pony Name",
            Field::LastName => "Family Herd",
            Field::Email => "Scroll Address",
            Field::BirthDate => "Moon of Birth",
            Field::City => "Village or Kingdom",
            Field::PostalCode => "Magic Scroll Code",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when a field name is not one of the six form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field '{}'", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for Field {
    type Err = UnknownField;

    /// Accepts both the camelCase wire name and snake_case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firstName" | "first_name" => Ok(Field::FirstName),
            "lastName" | "last_name" => Ok(Field::LastName),
            "email" => Ok(Field::Email),
            "birthDate" | "birth_date" => Ok(Field::BirthDate),
            "city" => Ok(Field::City),
            "postalCode" | "postal_code" => Ok(Field::PostalCode),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// In-progress form values. Nothing here has been validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
    pub city: String,
    pub postal_code: String,
}

impl Draft {
    /// Creates an empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites one field from raw input text.
    ///
    /// The birth date is parsed as `YYYY-MM-DD`; blank or unparsable input
    /// leaves it unset, like an HTML date input does.
    pub fn set(&mut self, field: Field, value: &str) {
        match field {
            Field::FirstName => self.first_name = value.to_string(),
            Field::LastName => self.last_name = value.to_string(),
            Field::Email => self.email = value.to_string(),
            Field::BirthDate => self.birth_date = parse_date(value),
            Field::City => self.city = value.to_string(),
            Field::PostalCode => self.postal_code = value.to_string(),
        }
    }

    /// Returns the raw text of a text field, `None` for the birth date.
    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::FirstName => Some(&self.first_name),
            Field::LastName => Some(&self.last_name),
            Field::Email => Some(&self.email),
            Field::BirthDate => None,
            Field::City => Some(&self.city),
            Field::PostalCode => Some(&self.postal_code),
        }
    }

    /// Returns whether a field holds something other than whitespace.
    pub fn is_present(&self, field: Field) -> bool {
        match field {
            Field::BirthDate => self.birth_date.is_some(),
            other => self
                .text(other)
                .map(|s| !s.trim().is_empty())
                .unwrap_or(false),
        }
    }

    /// Presence check across all six fields. Says nothing about validity.
    pub fn is_complete(&self) -> bool {
        Field::ALL.iter().all(|f| self.is_present(*f))
    }

    /// Returns whether every field is blank
    pub fn is_empty(&self) -> bool {
        *self == Draft::default()
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// A registration that passed every field rule.
///
/// Constructed only by `RegistrationSchema::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub city: String,
    pub postal_code: String,
}
