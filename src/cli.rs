use crate::actions::{auth, devices, events};
use crate::commands::{
    COMMAND_AUTH, COMMAND_DEVICES, COMMAND_EVENTS, COMMAND_EXPIRATION, COMMAND_GET, COMMAND_LIST,
    COMMAND_LOGIN, COMMAND_LOGOUT, COMMAND_SEARCH, COMMAND_VERSION,
};
use crate::error::CliError;
use clap::ArgMatches;

fn extract_subcommand_name(sub_matches: &ArgMatches) -> String {
    let message = match sub_matches.subcommand() {
        Some(m) => m.0,
        None => "unknown",
    };

    message.to_string()
}

pub async fn execute_command(commands: &ArgMatches) -> Result<(), CliError> {
    match commands.subcommand() {
        // Devices
        Some((COMMAND_DEVICES, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_LIST, sub_matches)) => Ok(devices::list_devices(sub_matches).await?),
            Some((COMMAND_GET, sub_matches)) => Ok(devices::print_device(sub_matches).await?),
            _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                sub_matches,
            ))),
        },
        // Events
        Some((COMMAND_EVENTS, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_LIST, sub_matches)) => Ok(events::list_events(sub_matches).await?),
            Some((COMMAND_GET, sub_matches)) => Ok(events::print_event(sub_matches).await?),
            Some((COMMAND_SEARCH, sub_matches)) => Ok(events::search_events(sub_matches).await?),
            _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                sub_matches,
            ))),
        },
        // Authentication
        Some((COMMAND_AUTH, sub_matches)) => match sub_matches.subcommand() {
            Some((COMMAND_LOGIN, _)) => Ok(auth::login().await?),
            Some((COMMAND_LOGOUT, _)) => Ok(auth::logout()?),
            Some((COMMAND_EXPIRATION, _)) => Ok(auth::print_expiration()?),
            _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
                sub_matches,
            ))),
        },
        Some((COMMAND_VERSION, _)) => {
            println!("vico-cli version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(
            commands,
        ))),
    }
}
