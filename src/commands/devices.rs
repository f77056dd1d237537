//! Device command definitions.

use crate::commands::params::{
    serial_number_parameter, COMMAND_DEVICES, COMMAND_GET, COMMAND_LIST,
};
use clap::Command;

/// Create the devices command with all its subcommands.
pub fn devices_command() -> Command {
    Command::new(COMMAND_DEVICES)
        .about("Manage Vicohome devices")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List all devices")
                .visible_alias("ls"),
        )
        .subcommand(
            Command::new(COMMAND_GET)
                .about("Get details for a specific device")
                .arg(serial_number_parameter()),
        )
}
