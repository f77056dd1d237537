use crate::exit_codes::ErrorCategory;
use thiserror::Error;

pub mod auth;
pub mod devices;
pub mod events;

#[derive(Debug, Error)]
pub enum CliActionError {
    #[error("{0}")]
    ApiError(#[from] crate::vicohome::ApiError),

    #[error("{0}")]
    OutputError(#[from] crate::output::OutputError),

    #[error("{0}")]
    FormattingError(#[from] crate::format::FormattingError),

    #[error("Error parsing time parameters: {0}")]
    TimeError(#[from] crate::time_utils::TimeError),

    #[error("{0}")]
    ConfigurationError(#[from] crate::configuration::ConfigurationError),

    #[error("{0}")]
    CacheError(#[from] crate::cache::CacheError),

    #[error("Missing required argument: {0}")]
    MissingRequiredArgument(String),
}

impl CliActionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CliActionError::ApiError(e) => e.category(),
            CliActionError::OutputError(e) => e.category(),
            CliActionError::FormattingError(_) => ErrorCategory::Parse,
            CliActionError::TimeError(_) | CliActionError::MissingRequiredArgument(_) => {
                ErrorCategory::Usage
            }
            CliActionError::ConfigurationError(_) => ErrorCategory::Configuration,
            CliActionError::CacheError(_) => ErrorCategory::Cache,
        }
    }
}
