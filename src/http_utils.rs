//! HTTP utilities for the vico-cli client.
//!
//! Every Vicohome call is a JSON POST against one base URL. This module
//! holds the endpoint table, the request description that flows through the
//! retry logic, and a thin wrapper around `reqwest` that sends it.

use crate::configuration::{Configuration, ConfigurationError};
use crate::envelope::StatusField;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// Known API endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    ListDevices,
    GetDevice,
    ListEvents,
    GetEvent,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Login => "account/login",
            Endpoint::ListDevices => "device/listuserdevices",
            Endpoint::GetDevice => "device/selectsingledevice",
            Endpoint::ListEvents => "library/newselectlibrary",
            Endpoint::GetEvent => "library/newselectsinglelibrary",
        }
    }

    /// The account and device families report `result`, the event library
    /// family reports `code`.
    pub fn status_field(&self) -> StatusField {
        match self {
            Endpoint::Login | Endpoint::ListDevices | Endpoint::GetDevice => StatusField::Result,
            Endpoint::ListEvents | Endpoint::GetEvent => StatusField::Code,
        }
    }
}

/// An outbound API call. The token is carried separately from the body so
/// that a retry can swap it without rebuilding the request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub body: serde_json::Value,
    token: Option<String>,
}

impl ApiRequest {
    pub fn new(endpoint: Endpoint, body: serde_json::Value) -> Self {
        Self {
            endpoint,
            body,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Replace the Authorization token in place.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }
}

/// Configuration for HTTP requests with common settings
#[derive(Debug, Clone)]
pub struct HttpRequestConfig {
    /// Base URL for the API, ending with a slash
    pub base_url: Url,
    /// Request timeout
    pub timeout: Duration,
}

impl HttpRequestConfig {
    pub fn from_configuration(configuration: &Configuration) -> Result<Self, ConfigurationError> {
        Ok(Self {
            base_url: configuration.api_base_url()?,
            timeout: configuration.timeout(),
        })
    }
}

/// HTTP client wrapper with the headers every Vicohome call needs
#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    config: HttpRequestConfig,
}

impl HttpClient {
    pub fn new(config: HttpRequestConfig) -> Result<Self, reqwest::Error> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(concat!("vico-cli/", env!("CARGO_PKG_VERSION")))
            .default_headers(default_headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    pub fn url_for(&self, endpoint: Endpoint) -> Url {
        // the base always ends with '/', and paths are relative
        match self.config.base_url.join(endpoint.path()) {
            Ok(url) => url,
            Err(_) => self.config.base_url.clone(),
        }
    }

    /// POST the request and return the raw response body.
    ///
    /// The HTTP status is not interpreted: the API reports failures inside
    /// the JSON envelope.
    pub async fn send(&self, request: &ApiRequest) -> Result<Vec<u8>, reqwest::Error> {
        let url = self.url_for(request.endpoint);
        trace!("POST {}", url);

        let mut builder = self.client.post(url).json(&request.body);
        if let Some(token) = request.token() {
            // raw token, no "Bearer " scheme
            builder = builder.header(AUTHORIZATION, token);
        }

        let response = builder.send().await?;
        debug!(
            "{} responded with HTTP {}",
            request.endpoint.path(),
            response.status()
        );

        let body = response.bytes().await?;
        trace!("Raw response body: {}", String::from_utf8_lossy(&body));
        Ok(body.to_vec())
    }
}
