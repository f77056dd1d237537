use tracing_subscriber::EnvFilter;
use vico_cli::{
    cli::execute_command,
    commands::{create_cli_commands, PARAMETER_VERBOSE},
    error_utils,
    exit_codes::VicoExitCode,
};

/// Initialize the logging subsystem. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Main entry point for the program
#[tokio::main]
async fn main() {
    let matches = match create_cli_commands().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            // help and version requests are not failures
            let code = if e.use_stderr() {
                VicoExitCode::UsageError
            } else {
                VicoExitCode::Success
            };
            let _ = e.print();
            std::process::exit(code.code());
        }
    };

    init_logging(matches.get_flag(PARAMETER_VERBOSE));

    if let Err(e) = execute_command(&matches).await {
        error_utils::report_error(&e);
        if let Some(hint) = error_utils::hint_for(&e) {
            eprintln!("{}", hint);
        }
        std::process::exit(e.exit_code().code());
    }
}
