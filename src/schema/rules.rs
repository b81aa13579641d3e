//! Field rules
//!
//! Each rule inspects one field of a draft and returns the violation, if
//! any. Rules for a field run in a fixed order and stop at the first
//! failure, so a field reports exactly one message.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

use super::errors::{FieldError, RuleViolation};
use super::types::{Draft, Field};

/// Letters (ASCII and Latin-1 accented, without × and ÷), hyphen,
/// whitespace and apostrophe.
const NAME_PATTERN: &str = r"^[a-zA-Z\x{C0}-\x{D6}\x{D8}-\x{F6}\x{F8}-\x{FF}\s'\-]+$";

/// Local part, `@`, dotted domain, alphabetic TLD. Leading dots and `..`
/// are rejected separately since the regex engine has no lookaround.
const EMAIL_PATTERN: &str = r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$";

const POSTAL_CODE_PATTERN: &str = r"^[0-9]{5}$";

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NAME_PATTERN).expect("name pattern is valid"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

fn postal_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(POSTAL_CODE_PATTERN).expect("postal code pattern is valid"))
}

/// Tunable parts of the rule set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOptions {
    /// Minimum character count for names and city
    pub min_text_length: usize,
    /// Minimum age in whole calendar years
    pub minimum_age: u32,
    /// Trim surrounding whitespace before counting characters
    pub trim_before_length_check: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            min_text_length: 2,
            minimum_age: 18,
            trim_before_length_check: false,
        }
    }
}

/// Inputs shared by every rule during one validation pass
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub field: Field,
    pub options: &'a SchemaOptions,
    pub today: NaiveDate,
}

/// A single field rule
pub type Rule = fn(&RuleContext<'_>, &Draft) -> Option<FieldError>;

const NAME_RULES: &[Rule] = &[min_length, name_charset];
const EMAIL_RULES: &[Rule] = &[email_shape];
const BIRTH_DATE_RULES: &[Rule] = &[birth_date];
const POSTAL_CODE_RULES: &[Rule] = &[postal_code];

/// Returns the ordered rules for a field
pub fn rules_for(field: Field) -> &'static [Rule] {
    match field {
        Field::FirstName | Field::LastName | Field::City => NAME_RULES,
        Field::Email => EMAIL_RULES,
        Field::BirthDate => BIRTH_DATE_RULES,
        Field::PostalCode => POSTAL_CODE_RULES,
    }
}

/// Runs a field's rules in order and returns the first violation.
pub fn check_field(ctx: &RuleContext<'_>, draft: &Draft) -> Option<FieldError> {
    rules_for(ctx.field).iter().find_map(|rule| rule(ctx, draft))
}

/// Subject used in the length and charset messages
fn subject(field: Field) -> &'static str {
    match field {
        Field::FirstName => "First name",
        Field::LastName => "Last name",
        Field::City => "City",
        Field::Email => "Scroll address",
        Field::BirthDate => "Birth date",
        Field::PostalCode => "Postal code",
    }
}

fn text<'d>(ctx: &RuleContext<'_>, draft: &'d Draft) -> &'d str {
    draft.text(ctx.field).unwrap_or("")
}

pub fn min_length(ctx: &RuleContext<'_>, draft: &Draft) -> Option<FieldError> {
    let value = text(ctx, draft);
    let value = if ctx.options.trim_before_length_check {
        value.trim()
    } else {
        value
    };

    if value.chars().count() >= ctx.options.min_text_length {
        return None;
    }

    Some(FieldError::new(
        ctx.field,
        RuleViolation::TooShort,
        format!(
            "{} must have at least {} characters",
            subject(ctx.field),
            ctx.options.min_text_length
        ),
    ))
}

pub fn name_charset(ctx: &RuleContext<'_>, draft: &Draft) -> Option<FieldError> {
    if name_regex().is_match(text(ctx, draft)) {
        return None;
    }

    Some(FieldError::new(
        ctx.field,
        RuleViolation::InvalidCharacters,
        format!("{} contains invalid characters", subject(ctx.field)),
    ))
}

/// Address shape only; nothing is resolved or delivered.
pub fn is_email_shaped(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && email_regex().is_match(value)
}

pub fn email_shape(ctx: &RuleContext<'_>, draft: &Draft) -> Option<FieldError> {
    if is_email_shaped(text(ctx, draft)) {
        return None;
    }

    Some(FieldError::new(
        ctx.field,
        RuleViolation::InvalidEmail,
        "Scroll address is not valid",
    ))
}

/// Latest birth date that is at least `years` old on `today`.
///
/// Calendar-year subtraction keeping month and day. A Feb 29 that does not
/// exist in the target year rolls forward to March 1.
pub fn age_cutoff(today: NaiveDate, years: u32) -> Option<NaiveDate> {
    let year = today.year().checked_sub(i32::try_from(years).ok()?)?;
    NaiveDate::from_ymd_opt(year, today.month(), today.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// Returns the birth date once it is set and at least the minimum age.
pub fn checked_birth_date(ctx: &RuleContext<'_>, draft: &Draft) -> Result<NaiveDate, FieldError> {
    let birth_date = draft.birth_date.ok_or_else(|| {
        FieldError::new(ctx.field, RuleViolation::MissingDate, "Invalid date")
    })?;

    let old_enough = age_cutoff(ctx.today, ctx.options.minimum_age)
        .map(|cutoff| birth_date <= cutoff)
        .unwrap_or(false);
    if !old_enough {
        return Err(FieldError::new(
            ctx.field,
            RuleViolation::Underage,
            format!(
                "You must be at least {} moons old to enter",
                ctx.options.minimum_age
            ),
        ));
    }

    Ok(birth_date)
}

pub fn birth_date(ctx: &RuleContext<'_>, draft: &Draft) -> Option<FieldError> {
    checked_birth_date(ctx, draft).err()
}

pub fn postal_code(ctx: &RuleContext<'_>, draft: &Draft) -> Option<FieldError> {
    if postal_code_regex().is_match(text(ctx, draft)) {
        return None;
    }

    Some(FieldError::new(
        ctx.field,
        RuleViolation::InvalidPostalCode,
        "Postal code must have exactly 5 digits",
    ))
}
