use crate::{
    actions::CliActionError,
    commands::params::{PARAMETER_FORMAT, PARAMETER_OUTPUT},
    format::OutputFormat,
    output::OutputDestination,
};
use clap::ArgMatches;
use tracing::trace;

/// The global `--format` value. Clap restricts it to known names and gives
/// it a default, so a missing or unknown value only happens for commands
/// built without it.
pub fn get_format_parameter_value(sub_matches: &ArgMatches) -> OutputFormat {
    trace!("Resolving output format...");

    let format = sub_matches
        .try_get_one::<String>(PARAMETER_FORMAT)
        .ok()
        .flatten()
        .and_then(|format| OutputFormat::parse(format).ok())
        .unwrap_or_default();

    trace!("Format: {}", format);
    format
}

pub fn get_output_destination(sub_matches: &ArgMatches) -> OutputDestination {
    sub_matches
        .try_get_one::<String>(PARAMETER_OUTPUT)
        .ok()
        .flatten()
        .and_then(|destination| destination.parse().ok())
        .unwrap_or_default()
}

pub fn get_required_string(sub_matches: &ArgMatches, name: &str) -> Result<String, CliActionError> {
    sub_matches
        .try_get_one::<String>(name)
        .ok()
        .flatten()
        .cloned()
        .ok_or_else(|| CliActionError::MissingRequiredArgument(name.to_string()))
}
