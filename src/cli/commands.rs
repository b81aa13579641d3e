//! CLI command implementations
//!
//! Each invocation drives at most one form instance:
//! 1. Load configuration
//! 2. Read the draft from stdin
//! 3. Run it through the schema or the full form
//! 4. Write one JSON response to stdout
//!
//! A draft that cannot be read as a flat object of known string fields,
//! including malformed or empty input, is answered on stdout like any other
//! rejected draft.

use std::path::Path;

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::config::FormConfig;
use crate::form::{
    load_record, FileStore, LogNotifier, Notice, RegistrationForm, SubmitOutcome,
};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::schema::{Clock, Draft, FieldErrors, RegistrationSchema, SystemClock};

use super::args::Command;
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{draft_entries, error_response, read_request, write_response, write_value};

/// Code reported when a draft fails validation
pub const VALIDATION_FAILED_CODE: &str = "REG_VALIDATION_FAILED";

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Validate { config } => validate(&config),
        Command::Submit { config } => submit(&config),
        Command::Show { config } => show(&config),
    }
}

fn load_config(path: &Path) -> CliResult<FormConfig> {
    let config = FormConfig::load(path)?;
    Logger::set_min_severity(config.log_severity()?);
    let shown = path.display().to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("path", shown.as_str()), ("store_dir", config.store_dir.as_str())],
    );
    Ok(config)
}

/// Validate a draft from stdin; nothing is stored
pub fn validate(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    respond(read_request().and_then(|request| {
        validate_request(&config, &request, SystemClock.today())
    }))
}

/// Submit a draft from stdin to the configured registry
pub fn submit(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    respond(read_request().and_then(|request| submit_request(&config, &request, SystemClock)))
}

fn respond(result: CliResult<Value>) -> CliResult<()> {
    write_value(&into_response(result)?)
}

/// Turns a rejected draft into an error response. Any other error fails the
/// command.
pub fn into_response(result: CliResult<Value>) -> CliResult<Value> {
    match result {
        Ok(response) => Ok(response),
        Err(e) if e.code() == &CliErrorCode::InvalidInput => {
            Ok(error_response(e.code_str(), e.message()))
        }
        Err(e) => Err(e),
    }
}

/// Print the stored registration
pub fn show(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let store = FileStore::new(config.store_path());
    let record = load_record(&store, &config.storage_key)?
        .ok_or_else(|| CliError::not_found(&config.storage_key))?;
    write_response(serde_json::to_value(record)?)
}

/// Build a draft from a request document
pub fn draft_from_request(request: &Value) -> CliResult<Draft> {
    let mut draft = Draft::new();
    for (field, value) in draft_entries(request)? {
        draft.set(field, &value);
    }
    Ok(draft)
}

/// Validate a request document as of `today` and build the response
pub fn validate_request(config: &FormConfig, request: &Value, today: NaiveDate) -> CliResult<Value> {
    let draft = draft_from_request(request)?;
    let schema = RegistrationSchema::with_options(config.schema_options());
    match schema.validate(&draft, today) {
        Ok(record) => Ok(json!({"status": "ok", "data": serde_json::to_value(record)?})),
        Err(errors) => Ok(invalid_response(&errors)),
    }
}

/// Run a request document through a form backed by the configured
/// registry and build the response
pub fn submit_request(
    config: &FormConfig,
    request: &Value,
    clock: impl Clock + 'static,
) -> CliResult<Value> {
    let entries = draft_entries(request)?;

    let mut form = RegistrationForm::new(
        |record| {
            Logger::info("REGISTRATION_RECEIVED", &[("city", record.city.as_str())]);
            Ok(())
        },
        LogNotifier,
        FileStore::new(config.store_path()),
    )
    .with_schema(RegistrationSchema::with_options(config.schema_options()))
    .with_mode(config.validation_mode)
    .with_storage_key(config.storage_key.clone())
    .with_clock(clock);

    for (field, value) in &entries {
        form.update_field(*field, value);
    }

    let response = match form.submit() {
        SubmitOutcome::Submitted(record) => json!({
            "status": "ok",
            "message": Notice::Success.message(),
            "data": serde_json::to_value(record)?,
        }),
        SubmitOutcome::Invalid(errors) => invalid_response(&errors),
        SubmitOutcome::Failed(err) => json!({
            "status": "error",
            "code": err.code(),
            "message": Notice::SubmissionFailed.message(),
        }),
    };
    Ok(response)
}

fn invalid_response(errors: &FieldErrors) -> Value {
    json!({
        "status": "error",
        "code": VALIDATION_FAILED_CODE,
        "message": Notice::ValidationFailed.message(),
        "errors": errors.to_map(),
    })
}
