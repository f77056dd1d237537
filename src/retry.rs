//! Request execution with a single transparent re-authentication.
//!
//! A request is sent once. If the API answers with one of the
//! "log in again" codes, the executor logs in, swaps the Authorization token
//! on the request and sends it exactly one more time. Whatever the second
//! response says is final.

use crate::auth::{AuthError, Authenticator};
use crate::error_utils;
use crate::exit_codes::ErrorCategory;
use crate::http_utils::{ApiRequest, HttpClient};
use crate::token_cache::{TokenCache, DEFAULT_TOKEN_VALIDITY_HOURS};
use crate::validator::{ResponseValidator, ValidationError};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("error making request: {0}")]
    HttpError(#[source] reqwest::Error),
    #[error("error making request after token refresh: {0}")]
    RetryHttpError(#[source] reqwest::Error),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("failed to refresh token: {0}")]
    RefreshFailed(#[source] AuthError),
}

impl ExecuteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExecuteError::HttpError(_) | ExecuteError::RetryHttpError(_) => {
                ErrorCategory::Transport
            }
            ExecuteError::Validation(e) => e.category(),
            ExecuteError::RefreshFailed(e) => e.category(),
        }
    }
}

#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Send the request and return the validated response body.
    async fn execute(&self, request: &mut ApiRequest) -> Result<Vec<u8>, ExecuteError>;
}

pub struct RetryingExecutor {
    http: HttpClient,
    validator: Arc<dyn ResponseValidator>,
    authenticator: Arc<dyn Authenticator>,
    cache: Option<TokenCache>,
    validity_hours: i64,
}

impl RetryingExecutor {
    /// `authenticator` must log in directly; a cached token is exactly what
    /// the API just rejected.
    pub fn new(
        http: HttpClient,
        validator: Arc<dyn ResponseValidator>,
        authenticator: Arc<dyn Authenticator>,
        cache: Option<TokenCache>,
    ) -> Self {
        Self {
            http,
            validator,
            authenticator,
            cache,
            validity_hours: DEFAULT_TOKEN_VALIDITY_HOURS,
        }
    }

    pub fn with_validity_hours(mut self, hours: i64) -> Self {
        self.validity_hours = hours;
        self
    }

    async fn refresh_token(&self) -> Result<String, ExecuteError> {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.clear() {
                warn!("Failed to clear token cache before refresh: {}", e);
            }
        }

        let token = self
            .authenticator
            .authenticate()
            .await
            .map_err(ExecuteError::RefreshFailed)?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.save(&token, self.validity_hours) {
                error_utils::report_warning(&format!("failed to cache token: {}", e));
            }
        }

        Ok(token)
    }
}

#[async_trait]
impl RequestExecutor for RetryingExecutor {
    async fn execute(&self, request: &mut ApiRequest) -> Result<Vec<u8>, ExecuteError> {
        let field = request.endpoint.status_field();

        let body = self
            .http
            .send(request)
            .await
            .map_err(ExecuteError::HttpError)?;

        match self.validator.validate(&body, field) {
            Ok(()) => return Ok(body),
            Err(e) if !e.needs_refresh() => return Err(e.into()),
            Err(e) => debug!("{}; refreshing token and retrying once", e),
        }

        let token = self.refresh_token().await?;
        request.set_token(token);

        let body = self
            .http
            .send(request)
            .await
            .map_err(ExecuteError::RetryHttpError)?;

        self.validator.validate(&body, field)?;
        Ok(body)
    }
}
