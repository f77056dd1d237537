use crate::{
    actions::CliActionError,
    commands::params::PARAMETER_SERIAL_NUMBER,
    configuration::Configuration,
    format::Formattable,
    model::NO_DEVICES_FOUND,
    param_utils::{get_format_parameter_value, get_required_string},
    vicohome::VicoApiClient,
};
use clap::ArgMatches;
use tracing::trace;

pub async fn list_devices(sub_matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"devices list\" command...");

    let format = get_format_parameter_value(sub_matches);
    let configuration = Configuration::load_default()?;
    let api = VicoApiClient::from_configuration(&configuration)?;

    let devices = api.list_devices().await?;
    trace!("Received {} devices", devices.len());

    if devices.is_empty() {
        println!("{}", NO_DEVICES_FOUND);
        return Ok(());
    }
    println!("{}", devices.format(format)?);
    Ok(())
}

pub async fn print_device(sub_matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"devices get\" command...");

    let format = get_format_parameter_value(sub_matches);
    let serial_number = get_required_string(sub_matches, PARAMETER_SERIAL_NUMBER)?;
    let configuration = Configuration::load_default()?;
    let api = VicoApiClient::from_configuration(&configuration)?;

    let device = api.get_device(&serial_number).await?;

    println!("{}", device.format(format)?);
    Ok(())
}
