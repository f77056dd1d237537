//! Shared command parameters for all CLI commands.
//!
//! This module defines common parameters that are used across multiple command modules.
//! It provides a centralized place to define parameter names and common argument configurations.

use crate::format::OutputFormat;
use crate::output::OutputDestination;
use crate::search::SearchField;
use crate::time_utils::DEFAULT_WINDOW_HOURS;
use clap::{value_parser, Arg, ArgAction};
use strum::VariantNames;

// Command groups
pub const COMMAND_DEVICES: &str = "devices";
pub const COMMAND_EVENTS: &str = "events";
pub const COMMAND_AUTH: &str = "auth";
pub const COMMAND_VERSION: &str = "version";

// Operations
pub const COMMAND_LIST: &str = "list";
pub const COMMAND_GET: &str = "get";
pub const COMMAND_SEARCH: &str = "search";

// Auth commands
pub const COMMAND_LOGIN: &str = "login";
pub const COMMAND_LOGOUT: &str = "logout";
pub const COMMAND_EXPIRATION: &str = "expiration";

// Parameter names
pub const PARAMETER_FORMAT: &str = "format";
pub const PARAMETER_VERBOSE: &str = "verbose";
pub const PARAMETER_SERIAL_NUMBER: &str = "serialNumber";
pub const PARAMETER_TRACE_ID: &str = "traceId";
pub const PARAMETER_HOURS: &str = "hours";
pub const PARAMETER_OUTPUT: &str = "output";
pub const PARAMETER_FIELD: &str = "field";
pub const PARAMETER_VALUE: &str = "value";
pub const PARAMETER_TERM: &str = "term";
pub const PARAMETER_START_TIME: &str = "startTime";
pub const PARAMETER_END_TIME: &str = "endTime";

pub const FORMAT_ENV: &str = "VICO_CLI_FORMAT";

/// Create the global format parameter.
///
/// This parameter is used across all commands for output formatting.
pub fn format_parameter() -> Arg {
    Arg::new(PARAMETER_FORMAT)
        .short('f')
        .long(PARAMETER_FORMAT)
        .num_args(1)
        .required(false)
        .env(FORMAT_ENV)
        .default_value("table")
        .global(true)
        .help("Output data format")
        .value_parser(OutputFormat::names())
}

pub fn verbose_parameter() -> Arg {
    Arg::new(PARAMETER_VERBOSE)
        .short('v')
        .long(PARAMETER_VERBOSE)
        .action(ArgAction::SetTrue)
        .global(true)
        .help("Enable verbose output for debugging")
}

pub fn serial_number_parameter() -> Arg {
    Arg::new(PARAMETER_SERIAL_NUMBER)
        .num_args(1)
        .required(true)
        .value_name("SERIAL_NUMBER")
        .help("Serial number of the device")
}

pub fn trace_id_parameter() -> Arg {
    Arg::new(PARAMETER_TRACE_ID)
        .num_args(1)
        .required(true)
        .value_name("TRACE_ID")
        .help("Trace ID of the event")
}

pub fn hours_parameter() -> Arg {
    Arg::new(PARAMETER_HOURS)
        .long(PARAMETER_HOURS)
        .num_args(1)
        .required(false)
        .default_value("24")
        .value_parser(value_parser!(i64).range(0..))
        .help("Number of hours to fetch events for")
}

/// Event output destination. Stdout honors `--format`.
pub fn output_parameter() -> Arg {
    Arg::new(PARAMETER_OUTPUT)
        .long(PARAMETER_OUTPUT)
        .num_args(1)
        .required(false)
        .default_value("stdout")
        .value_parser(OutputDestination::VARIANTS.to_vec())
        .help("Output destination")
}

/// The searched field. Kept as free text: an unknown field matches nothing.
pub fn field_parameter() -> Arg {
    Arg::new(PARAMETER_FIELD)
        .long(PARAMETER_FIELD)
        .num_args(1)
        .required(true)
        .help(format!(
            "Field to search ({})",
            SearchField::VARIANTS.join(", ")
        ))
}

pub fn value_parameter() -> Arg {
    Arg::new(PARAMETER_VALUE)
        .long(PARAMETER_VALUE)
        .num_args(1)
        .required(false)
        .help("Value to search for")
}

pub fn term_parameter() -> Arg {
    Arg::new(PARAMETER_TERM)
        .num_args(1)
        .required(false)
        .value_name("TERM")
        .help("Value to search for, if --value is not given")
}

pub fn start_time_parameter() -> Arg {
    Arg::new(PARAMETER_START_TIME)
        .long(PARAMETER_START_TIME)
        .num_args(1)
        .required(false)
        .help(format!(
            "Start time ('YYYY-MM-DD HH:MM:SS' or RFC3339, default: {} hours ago)",
            DEFAULT_WINDOW_HOURS
        ))
}

pub fn end_time_parameter() -> Arg {
    Arg::new(PARAMETER_END_TIME)
        .long(PARAMETER_END_TIME)
        .num_args(1)
        .required(false)
        .help("End time ('YYYY-MM-DD HH:MM:SS' or RFC3339, default: now)")
}
