//! CLI command definitions and argument parsing.
//!
//! This module defines all the CLI commands and their arguments using the clap crate.
//! Each command group lives in its own file; shared arguments live in `params`.

use clap::Command;

pub mod auth;
pub mod devices;
pub mod events;
pub mod params;

pub use params::{
    COMMAND_AUTH, COMMAND_DEVICES, COMMAND_EVENTS, COMMAND_EXPIRATION, COMMAND_GET, COMMAND_LIST,
    COMMAND_LOGIN, COMMAND_LOGOUT, COMMAND_SEARCH, COMMAND_VERSION, PARAMETER_FORMAT,
    PARAMETER_VERBOSE,
};

/// Create the full command tree.
///
/// Parsing is left to the caller so that usage errors can be mapped to the
/// CLI's own exit codes.
pub fn create_cli_commands() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interact with the Vicohome API")
        .long_about(
            "A CLI tool for interacting with the Vicohome API to fetch devices and events.\n\
             Credentials are read from VICOHOME_EMAIL and VICOHOME_PASSWORD.",
        )
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(params::verbose_parameter())
        .arg(params::format_parameter())
        .subcommand(devices::devices_command())
        .subcommand(events::events_command())
        .subcommand(auth::auth_command())
        .subcommand(Command::new(COMMAND_VERSION).about("Display the version of vico-cli"))
}
