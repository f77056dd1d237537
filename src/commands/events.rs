//! Event command definitions.

use crate::commands::params::{
    end_time_parameter, field_parameter, hours_parameter, output_parameter, start_time_parameter,
    term_parameter, trace_id_parameter, value_parameter, COMMAND_EVENTS, COMMAND_GET,
    COMMAND_LIST, COMMAND_SEARCH,
};
use clap::Command;

/// Create the events command with all its subcommands.
pub fn events_command() -> Command {
    Command::new(COMMAND_EVENTS)
        .about("Manage Vicohome events")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List events from the last N hours")
                .visible_alias("ls")
                .arg(hours_parameter())
                .arg(output_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_GET)
                .about("Get details for a specific event")
                .arg(trace_id_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_SEARCH)
                .about("Search events by field value")
                .long_about(
                    "Search for events that match a specific field value within a time range.\n\
                     Times are accepted as 'YYYY-MM-DD HH:MM:SS' (local time) or RFC3339.",
                )
                .arg(field_parameter())
                .arg(value_parameter())
                .arg(term_parameter())
                .arg(start_time_parameter())
                .arg(end_time_parameter())
                .arg(output_parameter()),
        )
}
