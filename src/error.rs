use thiserror::Error;

use crate::{actions::CliActionError, exit_codes::VicoExitCode};

/// Error types that can occur during CLI command execution
#[derive(Debug, Error)]
pub enum CliError {
    /// Error when an unsupported or undefined subcommand is encountered
    #[error("Undefined or unsupported subcommand: {0}")]
    UnsupportedSubcommand(String),
    #[error("{0}")]
    ActionError(#[from] CliActionError),
}

impl CliError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> VicoExitCode {
        match self {
            CliError::UnsupportedSubcommand(_) => VicoExitCode::UsageError,
            CliError::ActionError(e) => e.category().into(),
        }
    }
}
