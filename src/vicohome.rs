//! High-level client for the Vicohome cloud API.
//!
//! Every call obtains a token through the cached authenticator and is then
//! sent through the retrying executor, so a token invalidated server-side is
//! replaced transparently once.

use crate::auth::{
    AuthError, Authenticator, CachingAuthenticator, CredentialSource, DirectAuthenticator,
};
use crate::configuration::{Configuration, ConfigurationError};
use crate::envelope::{Envelope, EnvelopeError};
use crate::exit_codes::ErrorCategory;
use crate::http_utils::{ApiRequest, Endpoint, HttpClient, HttpRequestConfig};
use crate::model::{Device, DeviceList, Event, EventList};
use crate::retry::{ExecuteError, RequestExecutor, RetryingExecutor};
use crate::time_utils;
use crate::token_cache::TokenCache;
use crate::validator::EnvelopeValidator;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Error emitted by the Vicohome API client
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("authentication failed: {0}")]
    AuthError(#[from] AuthError),
    #[error(transparent)]
    RequestError(#[from] ExecuteError),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    JsonError(#[from] EnvelopeError),
    #[error(transparent)]
    ConfigurationError(#[from] ConfigurationError),
    #[error("failed to create HTTP client: {0}")]
    ClientError(#[source] reqwest::Error),
}

impl ApiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::AuthError(e) => e.category(),
            ApiError::RequestError(e) => e.category(),
            ApiError::NotFound(_) => ErrorCategory::Api,
            ApiError::JsonError(_) => ErrorCategory::Parse,
            ApiError::ConfigurationError(_) => ErrorCategory::Configuration,
            ApiError::ClientError(_) => ErrorCategory::Transport,
        }
    }
}

pub struct VicoApiClient {
    authenticator: Arc<dyn Authenticator>,
    direct: Arc<dyn Authenticator>,
    executor: Arc<dyn RequestExecutor>,
    cache: Option<TokenCache>,
    validity_hours: i64,
    language: String,
    country_no: String,
}

impl VicoApiClient {
    /// Build a client with credentials from the environment and the token
    /// cache at its default location.
    pub fn from_configuration(configuration: &Configuration) -> Result<Self, ApiError> {
        let cache = match TokenCache::new() {
            Ok(cache) => Some(cache),
            Err(e) => {
                debug!("Token cache unavailable: {}", e);
                None
            }
        };
        Self::assemble(configuration, CredentialSource::Environment, cache)
    }

    /// Wire the authenticators, validator and executor around one HTTP
    /// client and one (optional) token cache.
    pub fn assemble(
        configuration: &Configuration,
        credentials: CredentialSource,
        cache: Option<TokenCache>,
    ) -> Result<Self, ApiError> {
        let http = HttpClient::new(HttpRequestConfig::from_configuration(configuration)?)
            .map_err(ApiError::ClientError)?;
        let validity_hours = configuration.token_validity_hours();

        let direct: Arc<dyn Authenticator> =
            Arc::new(DirectAuthenticator::new(http.clone(), credentials));
        let authenticator = Arc::new(
            CachingAuthenticator::with_cache(direct.clone(), cache.clone())
                .with_validity_hours(validity_hours),
        );
        let executor = Arc::new(
            RetryingExecutor::new(
                http,
                Arc::new(EnvelopeValidator::new(cache.clone())),
                direct.clone(),
                cache.clone(),
            )
            .with_validity_hours(validity_hours),
        );

        Ok(Self {
            authenticator,
            direct,
            executor,
            cache,
            validity_hours,
            language: configuration.language().to_string(),
            country_no: configuration.country_no().to_string(),
        })
    }

    pub fn cache(&self) -> Option<&TokenCache> {
        self.cache.as_ref()
    }

    /// Log in with credentials regardless of the cache and store the new
    /// token. Returns the token.
    pub async fn login(&self) -> Result<String, ApiError> {
        let token = self.direct.authenticate().await?;
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.save(&token, self.validity_hours) {
                crate::error_utils::report_warning(&format!("failed to cache token: {}", e));
            }
        }
        Ok(token)
    }

    async fn call(&self, endpoint: Endpoint, body: Value) -> Result<Envelope, ApiError> {
        let token = self.authenticator.authenticate().await?;
        let mut request = ApiRequest::new(endpoint, body).with_token(token);
        let body = self.executor.execute(&mut request).await?;
        Ok(Envelope::parse(&body)?)
    }

    pub async fn list_devices(&self) -> Result<DeviceList, ApiError> {
        let envelope = self
            .call(
                Endpoint::ListDevices,
                json!({
                    "language": self.language,
                    "countryNo": self.country_no,
                }),
            )
            .await?;
        Ok(DeviceList::from_data(envelope.data.as_ref()))
    }

    pub async fn get_device(&self, serial_number: &str) -> Result<Device, ApiError> {
        let envelope = self
            .call(
                Endpoint::GetDevice,
                json!({
                    "serialNumber": serial_number,
                    "language": self.language,
                    "countryNo": self.country_no,
                }),
            )
            .await?;

        envelope
            .data_object()
            .map(Device::from_object)
            .ok_or_else(|| ApiError::NotFound("no device data found".to_string()))
    }

    pub async fn list_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<EventList, ApiError> {
        let envelope = self
            .call(
                Endpoint::ListEvents,
                json!({
                    "startTimestamp": time_utils::to_unix_string(start),
                    "endTimestamp": time_utils::to_unix_string(end),
                    "language": self.language,
                    "countryNo": self.country_no,
                }),
            )
            .await?;
        Ok(EventList::from_data(envelope.data.as_ref()))
    }

    /// The event is either `data` itself (when it has a `traceId`) or
    /// `data.event`.
    pub async fn get_event(&self, trace_id: &str) -> Result<Event, ApiError> {
        let envelope = self
            .call(
                Endpoint::GetEvent,
                json!({
                    "traceId": trace_id,
                    "language": self.language,
                    "countryNo": self.country_no,
                }),
            )
            .await?;

        let not_found = || ApiError::NotFound("no event data found".to_string());
        let data = envelope.data_object().ok_or_else(not_found)?;
        if data.get("traceId").is_some_and(Value::is_string) {
            return Ok(Event::from_object(data));
        }
        data.get("event")
            .and_then(Value::as_object)
            .map(Event::from_object)
            .ok_or_else(not_found)
    }
}
