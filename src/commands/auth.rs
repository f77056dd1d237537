//! Authentication command definitions.
//!
//! This module defines CLI commands related to authentication and session management.

use crate::commands::params::{COMMAND_AUTH, COMMAND_EXPIRATION, COMMAND_LOGIN, COMMAND_LOGOUT};
use clap::Command;

/// Create the authentication command with all its subcommands.
pub fn auth_command() -> Command {
    Command::new(COMMAND_AUTH)
        .about("Authentication operations")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LOGIN)
                .about("Login with VICOHOME_EMAIL and VICOHOME_PASSWORD and cache the token"),
        )
        .subcommand(Command::new(COMMAND_LOGOUT).about("Clear the cached access token"))
        .subcommand(
            Command::new(COMMAND_EXPIRATION)
                .about("Show the expiration time of the cached access token"),
        )
}
