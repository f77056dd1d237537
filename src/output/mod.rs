//! Destinations for event output.
//!
//! Event listings can go to stdout in any `OutputFormat` or be written to an
//! InfluxDB bucket as `bird_sighting` points.

pub mod influxdb;
pub mod stdout;

use crate::exit_codes::ErrorCategory;
use crate::format::{FormattingError, OutputFormat};
use crate::model::Event;
use async_trait::async_trait;
use std::time::Duration;
use strum::{Display, EnumString, VariantNames};
use thiserror::Error;

pub use influxdb::InfluxDbHandler;
pub use stdout::StdoutHandler;

pub const INFLUX_URL_ENV: &str = "INFLUX_URL";
pub const INFLUX_ORG_ENV: &str = "INFLUX_ORG";
pub const INFLUX_BUCKET_ENV: &str = "INFLUX_BUCKET";
pub const INFLUX_TOKEN_ENV: &str = "INFLUX_TOKEN";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error(transparent)]
    Format(#[from] FormattingError),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} is required (set {1})")]
    MissingConfig(&'static str, &'static str),
    #[error("invalid InfluxDB URL {0:?}")]
    InvalidUrl(String),
    #[error("error writing to InfluxDB: {0}")]
    Http(#[from] reqwest::Error),
    #[error("error writing to InfluxDB: HTTP {status}: {body}")]
    Write { status: u16, body: String },
}

impl OutputError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            OutputError::Format(_) => ErrorCategory::Parse,
            OutputError::Io(_) => ErrorCategory::Cache,
            OutputError::MissingConfig(..) | OutputError::InvalidUrl(_) => {
                ErrorCategory::Configuration
            }
            OutputError::Http(_) => ErrorCategory::Transport,
            OutputError::Write { .. } => ErrorCategory::Api,
        }
    }
}

/// Where event output goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputDestination {
    #[default]
    Stdout,
    #[strum(serialize = "influxdb")]
    InfluxDb,
}

/// Sink settings, read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputConfig {
    pub influx_url: String,
    pub influx_org: String,
    pub influx_bucket: String,
    pub influx_token: String,
}

impl OutputConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).unwrap_or_default();
        Self {
            influx_url: get(INFLUX_URL_ENV),
            influx_org: get(INFLUX_ORG_ENV),
            influx_bucket: get(INFLUX_BUCKET_ENV),
            influx_token: get(INFLUX_TOKEN_ENV),
        }
    }
}

#[async_trait]
pub trait OutputHandler: Send + Sync {
    /// Emit a batch of events.
    async fn write(&self, events: &[Event]) -> Result<(), OutputError>;

    /// Release resources held by the handler.
    async fn close(&self) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Pick the handler for a destination. Stdout honors `format`; InfluxDB
/// ignores it.
pub fn create_handler(
    destination: OutputDestination,
    format: OutputFormat,
    config: &OutputConfig,
    timeout: Duration,
) -> Result<Box<dyn OutputHandler>, OutputError> {
    match destination {
        OutputDestination::Stdout => Ok(Box::new(StdoutHandler::new(format))),
        OutputDestination::InfluxDb => Ok(Box::new(InfluxDbHandler::new(config, timeout)?)),
    }
}
