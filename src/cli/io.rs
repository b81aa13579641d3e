//! JSON I/O handling for CLI
//!
//! - Input: a single JSON object on stdin
//! - Output: a single JSON object on stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::{Map, Value};

use super::errors::{CliError, CliResult};
use crate::schema::Field;

/// Read a whole JSON object from stdin
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_request(&input)
}

/// Parse request text into a JSON value
pub fn parse_request(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::invalid_input("Empty input"));
    }
    Ok(serde_json::from_str(input)?)
}

/// Split a draft document into field/value pairs in field order.
///
/// Every key must name a form field and every value must be a string or
/// null (treated as empty).
pub fn draft_entries(value: &Value) -> CliResult<Vec<(Field, String)>> {
    let obj: &Map<String, Value> = value
        .as_object()
        .ok_or_else(|| CliError::invalid_input("Draft must be a JSON object"))?;

    let mut entries = Vec::with_capacity(obj.len());
    for (key, raw) in obj {
        let field: Field = key
            .parse()
            .map_err(|e: crate::schema::UnknownField| CliError::invalid_input(e.to_string()))?;
        let text = match raw {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => {
                return Err(CliError::invalid_input(format!(
                    "field '{}' must be a string, got {}",
                    key, other
                )))
            }
        };
        entries.push((field, text));
    }
    entries.sort_by_key(|(field, _)| *field);
    Ok(entries)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_value(&serde_json::json!({
        "status": "ok",
        "data": data
    }))
}

/// Build an error response
pub fn error_response(code: &str, message: &str) -> Value {
    serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// Write an arbitrary JSON value to stdout as one line
pub fn write_value(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
