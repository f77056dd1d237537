//! Authentication against the Vicohome account API.
//!
//! `DirectAuthenticator` performs the credential login. `CachingAuthenticator`
//! puts the token cache in front of it so that most commands never log in.

use crate::envelope::{Envelope, EnvelopeError};
use crate::error_utils;
use crate::exit_codes::ErrorCategory;
use crate::http_utils::{ApiRequest, Endpoint, HttpClient};
use crate::token_cache::{TokenCache, DEFAULT_TOKEN_VALIDITY_HOURS};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

pub const EMAIL_ENV: &str = "VICOHOME_EMAIL";
pub const PASSWORD_ENV: &str = "VICOHOME_PASSWORD";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("VICOHOME_EMAIL and VICOHOME_PASSWORD environment variables are required")]
    MissingCredentials,
    #[error("error making login request: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("{0}")]
    ResponseError(#[from] EnvelopeError),
    #[error("API error: {msg} (code: {code})")]
    ApiError { code: i64, msg: String },
    #[error("login failed: missing data in response")]
    MissingData,
    #[error("login failed: missing token in response")]
    MissingToken,
    #[error("login failed: empty token in response")]
    EmptyToken,
}

impl AuthError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AuthError::MissingCredentials => ErrorCategory::Configuration,
            AuthError::HttpError(_) => ErrorCategory::Transport,
            AuthError::ResponseError(_) => ErrorCategory::Parse,
            AuthError::ApiError { .. }
            | AuthError::MissingData
            | AuthError::MissingToken
            | AuthError::EmptyToken => ErrorCategory::Authentication,
        }
    }
}

/// Login credentials. Never persisted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Build credentials from a variable lookup, failing if either is empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Credentials, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let email = lookup(EMAIL_ENV).unwrap_or_default();
        let password = lookup(PASSWORD_ENV).unwrap_or_default();
        Credentials::new(email, password).validated()
    }

    pub fn from_env() -> Result<Credentials, AuthError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn validated(self) -> Result<Credentials, AuthError> {
        if self.email.is_empty() || self.password.is_empty() {
            Err(AuthError::MissingCredentials)
        } else {
            Ok(self)
        }
    }
}

/// Where the direct authenticator gets its credentials from.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Read the environment on every login.
    Environment,
    Fixed(Credentials),
}

impl CredentialSource {
    fn resolve(&self) -> Result<Credentials, AuthError> {
        match self {
            CredentialSource::Environment => Credentials::from_env(),
            CredentialSource::Fixed(credentials) => credentials.clone().validated(),
        }
    }
}

/// Something that can hand out a bearer token.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self) -> Result<String, AuthError>;
}

/// Logs in with email and password on every call.
pub struct DirectAuthenticator {
    http: HttpClient,
    credentials: CredentialSource,
}

impl DirectAuthenticator {
    pub fn new(http: HttpClient, credentials: CredentialSource) -> Self {
        Self { http, credentials }
    }

    pub async fn authenticate_directly(&self) -> Result<String, AuthError> {
        let credentials = self.credentials.resolve()?;

        let request = ApiRequest::new(
            Endpoint::Login,
            json!({
                "email": credentials.email,
                "password": credentials.password,
                "loginType": 0,
            }),
        );

        debug!("Logging in as {}", credentials.email);
        let body = self.http.send(&request).await?;
        extract_token(&body)
    }
}

#[async_trait]
impl Authenticator for DirectAuthenticator {
    async fn authenticate(&self) -> Result<String, AuthError> {
        self.authenticate_directly().await
    }
}

/// Pull `data.token.token` out of a login response.
fn extract_token(body: &[u8]) -> Result<String, AuthError> {
    let envelope = Envelope::parse(body)?;

    if let Some(code) = envelope.status(Endpoint::Login.status_field())? {
        if code != 0 {
            return Err(AuthError::ApiError {
                code,
                msg: envelope.msg,
            });
        }
    }

    let data = match envelope.data_object() {
        Some(data) if !data.is_empty() => data,
        _ => return Err(AuthError::MissingData),
    };

    let token = data
        .get("token")
        .and_then(serde_json::Value::as_object)
        .ok_or(AuthError::MissingToken)?;

    match token.get("token").and_then(serde_json::Value::as_str) {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(AuthError::EmptyToken),
    }
}

/// Serves tokens from the cache, logging in only on a miss.
pub struct CachingAuthenticator {
    direct: Arc<dyn Authenticator>,
    cache: Option<TokenCache>,
    validity_hours: i64,
}

impl CachingAuthenticator {
    /// Without a cache every call logs in.
    pub fn with_cache(direct: Arc<dyn Authenticator>, cache: Option<TokenCache>) -> Self {
        Self {
            direct,
            cache,
            validity_hours: DEFAULT_TOKEN_VALIDITY_HOURS,
        }
    }

    pub fn with_validity_hours(mut self, hours: i64) -> Self {
        self.validity_hours = hours;
        self
    }
}

#[async_trait]
impl Authenticator for CachingAuthenticator {
    async fn authenticate(&self) -> Result<String, AuthError> {
        let Some(cache) = &self.cache else {
            return self.direct.authenticate().await;
        };

        if let Some(token) = cache.load() {
            debug!("Using cached token");
            return Ok(token);
        }

        debug!("No valid cached token, logging in");
        let token = self.direct.authenticate().await?;
        if let Err(e) = cache.save(&token, self.validity_hours) {
            error_utils::report_warning(&format!("failed to cache token: {}", e));
        }
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingAuthenticator {
        calls: AtomicUsize,
        result: Result<String, ()>,
    }

    impl CountingAuthenticator {
        fn ok(token: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result: Ok(token.to_string()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result: Err(()),
            })
        }
    }

    #[async_trait]
    impl Authenticator for CountingAuthenticator {
        async fn authenticate(&self) -> Result<String, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().map_err(|_| AuthError::MissingCredentials)
        }
    }

    #[test]
    fn test_credentials_missing_names_both_variables() {
        let error = Credentials::from_lookup(|_| None).unwrap_err();
        let message = error.to_string();
        assert!(message.contains("VICOHOME_EMAIL"));
        assert!(message.contains("VICOHOME_PASSWORD"));
        assert_eq!(error.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_credentials_one_empty_variable() {
        let result = Credentials::from_lookup(|name| {
            (name == EMAIL_ENV).then(|| "me@example.com".to_string())
        });
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials::new("me@example.com", "hunter2");
        assert!(!format!("{:?}", credentials).contains("hunter2"));
    }

    #[test]
    fn test_extract_token_success() {
        let body = br#"{"result":0,"msg":"success","data":{"token":{"token":"abc"}}}"#;
        assert_eq!(extract_token(body).unwrap(), "abc");
    }

    #[test]
    fn test_extract_token_api_error() {
        let body = br#"{"result":-1001,"msg":"wrong password"}"#;
        let error = extract_token(body).unwrap_err();
        assert_eq!(error.to_string(), "API error: wrong password (code: -1001)");
    }

    #[test]
    fn test_extract_token_failure_precedence() {
        assert!(matches!(
            extract_token(br#"{"result":0,"data":{}}"#),
            Err(AuthError::MissingData)
        ));
        assert!(matches!(
            extract_token(br#"{"result":0,"data":null}"#),
            Err(AuthError::MissingData)
        ));
        assert!(matches!(
            extract_token(br#"{"result":0,"data":{"user":1}}"#),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            extract_token(br#"{"result":0,"data":{"token":{"token":""}}}"#),
            Err(AuthError::EmptyToken)
        ));
        assert!(matches!(
            extract_token(b"not json"),
            Err(AuthError::ResponseError(_))
        ));
    }

    #[tokio::test]
    async fn test_cached_token_skips_login() {
        let temp = TempDir::new().unwrap();
        let cache = TokenCache::in_dir(temp.path());
        cache.save("cached", 1).unwrap();

        let direct = CountingAuthenticator::ok("fresh");
        let authenticator = CachingAuthenticator::with_cache(direct.clone(), Some(cache));

        assert_eq!(authenticator.authenticate().await.unwrap(), "cached");
        assert_eq!(direct.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cache_miss_logs_in_and_saves() {
        let temp = TempDir::new().unwrap();
        let cache = TokenCache::in_dir(temp.path());

        let direct = CountingAuthenticator::ok("fresh");
        let authenticator =
            CachingAuthenticator::with_cache(direct.clone(), Some(cache.clone()));

        assert_eq!(authenticator.authenticate().await.unwrap(), "fresh");
        assert_eq!(direct.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.load(), Some("fresh".to_string()));

        // second call is served from the cache
        assert_eq!(authenticator.authenticate().await.unwrap(), "fresh");
        assert_eq!(direct.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_save_failure_does_not_fail_authentication() {
        let temp = TempDir::new().unwrap();
        // a regular file where the cache directory should be
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let cache = TokenCache::in_dir(blocker.join("dir"));

        let direct = CountingAuthenticator::ok("fresh");
        let authenticator = CachingAuthenticator::with_cache(direct, Some(cache));

        assert_eq!(authenticator.authenticate().await.unwrap(), "fresh");
    }

    #[tokio::test]
    async fn test_login_error_is_propagated() {
        let temp = TempDir::new().unwrap();
        let cache = TokenCache::in_dir(temp.path());
        let authenticator =
            CachingAuthenticator::with_cache(CountingAuthenticator::failing(), Some(cache.clone()));

        assert!(matches!(
            authenticator.authenticate().await,
            Err(AuthError::MissingCredentials)
        ));
        assert!(!cache.path().exists());
    }

    #[tokio::test]
    async fn test_without_cache_always_logs_in() {
        let direct = CountingAuthenticator::ok("fresh");
        let authenticator = CachingAuthenticator::with_cache(direct.clone(), None);

        authenticator.authenticate().await.unwrap();
        authenticator.authenticate().await.unwrap();
        assert_eq!(direct.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_credentials_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let login = server
            .mock("POST", "/account/login")
            .expect(0)
            .create_async()
            .await;

        let http = HttpClient::new(crate::http_utils::HttpRequestConfig {
            base_url: url::Url::parse(&format!("{}/", server.url())).unwrap(),
            timeout: std::time::Duration::from_secs(5),
        })
        .unwrap();
        let direct =
            DirectAuthenticator::new(http, CredentialSource::Fixed(Credentials::default()));

        let error = direct.authenticate_directly().await.unwrap_err();
        assert!(error.to_string().contains("VICOHOME_EMAIL"));
        assert!(error.to_string().contains("VICOHOME_PASSWORD"));
        login.assert_async().await;
    }
}
