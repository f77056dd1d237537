use crate::{
    actions::CliActionError,
    commands::params::{
        PARAMETER_END_TIME, PARAMETER_FIELD, PARAMETER_HOURS, PARAMETER_START_TIME,
        PARAMETER_TERM, PARAMETER_TRACE_ID, PARAMETER_VALUE,
    },
    configuration::Configuration,
    format::Formattable,
    model::Event,
    output::{create_handler, OutputConfig, OutputHandler},
    param_utils::{get_format_parameter_value, get_output_destination, get_required_string},
    search::matches_search,
    time_utils::{self, DEFAULT_WINDOW_HOURS},
    vicohome::VicoApiClient,
};
use clap::ArgMatches;
use tracing::{debug, trace};

async fn emit(
    sub_matches: &ArgMatches,
    configuration: &Configuration,
    events: &[Event],
) -> Result<(), CliActionError> {
    let handler: Box<dyn OutputHandler> = create_handler(
        get_output_destination(sub_matches),
        get_format_parameter_value(sub_matches),
        &OutputConfig::from_env(),
        configuration.timeout(),
    )?;

    let written = handler.write(events).await;
    let closed = handler.close().await;
    written?;
    closed?;
    Ok(())
}

pub async fn list_events(sub_matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"events list\" command...");

    let hours = sub_matches
        .get_one::<i64>(PARAMETER_HOURS)
        .copied()
        .unwrap_or(DEFAULT_WINDOW_HOURS);
    let (start, end) = time_utils::last_hours(hours)?;
    let configuration = Configuration::load_default()?;
    let api = VicoApiClient::from_configuration(&configuration)?;

    debug!("Fetching events between {} and {}", start, end);
    let events = api.list_events(start, end).await?;

    emit(sub_matches, &configuration, events.events()).await
}

pub async fn print_event(sub_matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"events get\" command...");

    let format = get_format_parameter_value(sub_matches);
    let trace_id = get_required_string(sub_matches, PARAMETER_TRACE_ID)?;
    let configuration = Configuration::load_default()?;
    let api = VicoApiClient::from_configuration(&configuration)?;

    let event = api.get_event(&trace_id).await?;

    println!("{}", event.format(format)?);
    Ok(())
}

pub async fn search_events(sub_matches: &ArgMatches) -> Result<(), CliActionError> {
    trace!("Executing \"events search\" command...");

    let field = get_required_string(sub_matches, PARAMETER_FIELD)?;
    let term = sub_matches
        .get_one::<String>(PARAMETER_VALUE)
        .or_else(|| sub_matches.get_one::<String>(PARAMETER_TERM))
        .filter(|term| !term.is_empty())
        .cloned()
        .ok_or_else(|| CliActionError::MissingRequiredArgument("search term".to_string()))?;

    // validate the window before any network traffic
    let (default_start, default_end) = time_utils::last_hours(DEFAULT_WINDOW_HOURS)?;
    let start = sub_matches
        .get_one::<String>(PARAMETER_START_TIME)
        .cloned()
        .unwrap_or_else(|| default_start.to_rfc3339());
    let end = sub_matches
        .get_one::<String>(PARAMETER_END_TIME)
        .cloned()
        .unwrap_or_else(|| default_end.to_rfc3339());
    let (start, end) = time_utils::parse_time_parameters(&start, &end)?;

    let configuration = Configuration::load_default()?;
    let api = VicoApiClient::from_configuration(&configuration)?;

    debug!("Searching events between {} and {}", start, end);
    let events = api
        .list_events(start, end)
        .await?
        .filtered(|event| matches_search(event, &field, &term));

    if events.is_empty() {
        println!("No events found matching {} = '{}'", field, term);
        return Ok(());
    }

    emit(sub_matches, &configuration, events.events()).await
}
