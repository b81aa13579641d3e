//! CLI module for regform
//!
//! Provides command-line interface for:
//! - validate: check a draft against the schema
//! - submit: run a draft through the form into the local registry
//! - show: read the stored registration back

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    draft_from_request, into_response, run, run_command, show, submit, submit_request, validate,
    validate_request, VALIDATION_FAILED_CODE,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{draft_entries, error_response, parse_request, read_request, write_response};
